// Interactive terminal chat against a running relay.

use anyhow::{Context, Result};
use std::io::{self, Write};
use tracing::info;

use crate::config::ClientConfig;
use crate::relay_client::RelayClient;
use crate::render::render_message;
use crate::session::{ChatSession, EXAMPLE_PROMPTS};

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Attach(&'a str),
    AttachUsage,
    Remove,
    Examples,
    Send(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("/quit") || line.eq_ignore_ascii_case("exit") {
        return Command::Quit;
    }
    if line.eq_ignore_ascii_case("/remove") {
        return Command::Remove;
    }
    if line.eq_ignore_ascii_case("/examples") {
        return Command::Examples;
    }
    if line.eq_ignore_ascii_case("/image") {
        return Command::AttachUsage;
    }
    if let Some(path) = line.strip_prefix("/image ") {
        let path = path.trim();
        if path.is_empty() {
            return Command::AttachUsage;
        }
        return Command::Attach(path);
    }
    Command::Send(line)
}

pub async fn run_chat(config: ClientConfig) -> Result<()> {
    info!(api_url = %config.api_url, "Starting chat session");
    let relay = RelayClient::new(&config)?;
    let mut session = ChatSession::new(relay);

    for msg in session.messages() {
        println!("{}\n", render_message(msg));
    }
    println!("commands: /image <path>, /remove, /examples, /quit");

    loop {
        let marker = if session.attachment().is_some() { "📎 " } else { "" };
        print!("{}> ", marker);
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        if io::stdin()
            .read_line(&mut input)
            .context("Failed to read stdin")?
            == 0
        {
            break;
        }

        match parse_command(&input) {
            Command::Quit => break,
            Command::Remove => {
                session.remove_image();
                println!("image removed\n");
            }
            Command::Examples => {
                println!("Try asking:");
                for example in EXAMPLE_PROMPTS {
                    println!("  - {}", example);
                }
                println!();
            }
            Command::AttachUsage => println!("usage: /image <path>\n"),
            Command::Attach(path) => match session.attach_image(path) {
                Ok(()) => println!("attached {}\n", path),
                Err(e) => println!("could not attach image: {:#}\n", e),
            },
            Command::Send(text) => {
                let before = session.messages().len();
                println!("⏳");
                session.submit(text).await;
                for msg in &session.messages()[before..] {
                    println!("{}\n", render_message(msg));
                }
            }
        }
    }

    info!("Chat session finished.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("/quit\n"), Command::Quit);
        assert_eq!(parse_command("EXIT"), Command::Quit);
        assert_eq!(parse_command("/remove"), Command::Remove);
        assert_eq!(parse_command("/examples"), Command::Examples);
        assert_eq!(parse_command("/image  ./shoe.png \n"), Command::Attach("./shoe.png"));
        assert_eq!(parse_command("/image"), Command::AttachUsage);
        assert_eq!(parse_command("/image   \n"), Command::AttachUsage);
        assert_eq!(parse_command("  Recommend a tee \n"), Command::Send("Recommend a tee"));
        assert_eq!(parse_command(""), Command::Send(""));
    }
}
