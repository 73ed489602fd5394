//! ocon demo - a headless console driven from stdin
//!
//! Each stdin line is fed to the console as typed text plus Return; a
//! consumer thread blocks on submitted lines and runs a few demo
//! commands (`clear`, `limit <n>`, `spam`, `shutdown`, anything else is
//! echoed). The owner loop pumps the console and reprints the visible
//! screen whenever it changes.

use std::io::BufRead;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::{debug, info};

use ocon::console::{Console, ConsoleHandle};
use ocon::text::{decode_utf8, encode_utf8};
use ocon::{Config, Event, Key, Modifiers};

fn run_command(handle: &ConsoleHandle, line: &str) {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("clear") => handle.clear(),
        Some("limit") => match parts.next().and_then(|n| n.parse::<usize>().ok()) {
            Some(n) => handle.set_scrollback_limit(n),
            None => handle.append_output("usage: limit <lines>"),
        },
        Some("spam") => {
            for i in 0..50 {
                handle.append_output(format!("spam line {}", i));
            }
        }
        Some("shutdown") => handle.shutdown(),
        Some(_) => handle.append_output(format!("echo: {}", line)),
        None => {}
    }
}

fn draw(console: &Console) {
    println!("{}", "-".repeat(console.screen().columns()));
    for line in console.screen().visible_lines() {
        println!("{}", line.text);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::load();
    let poll = Duration::from_millis(config.runtime.poll_interval_ms);
    let mut console = Console::new(&config);

    // Command consumer: blocks on submitted lines the way an embedded
    // shell would, until the EOF sentinel.
    let consumer = {
        let handle = console.handle();
        thread::spawn(move || {
            while let Some(line) = handle.get_line_blocking() {
                debug!("consumer got line: {:?}", line);
                run_command(&handle, line.trim());
            }
        })
    };

    // Stdin feeder: raw bytes per line, decoded lossily, then submitted.
    // Not joined: a `shutdown` command leaves it blocked in read until
    // the process exits.
    {
        let handle = console.handle();
        thread::spawn(move || {
            let stdin = std::io::stdin();
            let mut lock = stdin.lock();
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match lock.read_until(b'\n', &mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        if buf.last() == Some(&b'\n') {
                            buf.pop();
                        }
                        let text = encode_utf8(&decode_utf8(&buf));
                        handle.push_event(Event::Text(text));
                        handle.push_event(Event::Key {
                            key: Key::Return,
                            mods: Modifiers::empty(),
                        });
                    }
                }
            }
            handle.shutdown();
        });
    }

    let mut last_drawn = console.screen().revision();
    while console.pump(poll) {
        let revision = console.screen().revision();
        if revision != last_drawn {
            last_drawn = revision;
            draw(&console);
        }
    }
    info!("owner loop exited");

    consumer.join().ok();
    Ok(())
}
