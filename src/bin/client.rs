//! dictd-client - interactive client for dictd
//!
//! Reads lines from stdin, sends them to the server and prints whatever the
//! server sends back. It has no protocol knowledge of its own.

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[derive(Parser, Debug)]
#[command(name = "dictd-client", version, about = "Interactive dictd client")]
struct Args {
    /// Server host
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,
    /// Server port
    #[arg(short, long, default_value_t = dictd::DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let address = format!("{}:{}", args.host, args.port);

    let stream = TcpStream::connect(&address)
        .await
        .with_context(|| format!("failed to connect to {}", address))?;
    println!("Connected to {}. Type `close` to quit.", address);

    let (reader, mut writer) = stream.into_split();

    // Print server output as it arrives
    let printer = tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            println!("Server replied: {}", line);
        }
        println!("Connection closed by server.");
    });

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    tokio::select! {
        result = async {
            while let Some(line) = stdin.next_line().await? {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                if line == "close" {
                    break;
                }
            }
            anyhow::Ok(())
        } => result?,
        _ = printer => {}
    }

    Ok(())
}
