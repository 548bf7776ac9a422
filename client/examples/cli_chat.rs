use std::sync::{Arc, Mutex};

use anyhow::Result;
use parley_client::{
    ClientConfig, HostEvent, ParleyClient, ParleyHandle, RoomId, RoomUpdate, TokenEvent,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};

const ROOM_ENV: &str = "PARLEY_ROOM";

type CurrentRoom = Arc<Mutex<Option<RoomId>>>;

fn print_help() {
    println!("Commands:");
    println!("  /room <room>   - Switch to an open room");
    println!("  /pm <user>     - Open a PM with a user");
    println!("  /quit          - Exit");
    println!("  <anything>     - Typed into the current room (/join, /leave, /challenge ...)");
}

fn print_line(room: &RoomId, event: &TokenEvent) {
    match event.tag() {
        "c" | "chat" => println!(
            "[{}] {}: {}",
            room,
            event.get(1).unwrap_or_default().trim(),
            event.rest(2).unwrap_or_default()
        ),
        "c:" => println!(
            "[{}] {}: {}",
            room,
            event.get(2).unwrap_or_default().trim(),
            event.rest(3).unwrap_or_default()
        ),
        "j" | "J" | "join" => println!("[{}] {} joined", room, event.get(1).unwrap_or_default().trim()),
        "l" | "L" | "leave" => println!("[{}] {} left", room, event.get(1).unwrap_or_default().trim()),
        "error" => println!("[{}] Error: {}", room, event.rest(1).unwrap_or_default()),
        "" => println!("[{}] {}", room, event.rest(1).unwrap_or_default()),
        _ => {}
    }
}

async fn print_events(mut events: broadcast::Receiver<HostEvent>, current: CurrentRoom) {
    loop {
        match events.recv().await {
            Ok(HostEvent::Opened(room)) => {
                println!("Opened {}", room);
                if let Ok(mut current) = current.lock() {
                    *current = Some(room);
                }
            }
            Ok(HostEvent::Closed(room)) => {
                println!("Closed {}", room);
                if let Ok(mut current) = current.lock()
                    && current.as_ref() == Some(&room)
                {
                    *current = None;
                }
            }
            Ok(HostEvent::Update {
                room,
                update: RoomUpdate::Line(event),
            }) => print_line(&room, &event),
            Ok(HostEvent::Update { .. }) => {}
            Ok(HostEvent::Popup(text)) => println!("*** {}", text),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Display fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn handle_input(line: &str, handle: &ParleyHandle, current: &CurrentRoom) -> Result<bool> {
    let line = line.trim_end();

    if let Some(rest) = line.strip_prefix('/') {
        let (cmd, arg) = rest.split_once(' ').unwrap_or((rest, ""));
        match cmd {
            "help" => {
                print_help();
                return Ok(true);
            }
            "quit" | "exit" => return Ok(false),
            "room" => {
                if let Ok(mut current) = current.lock() {
                    *current = Some(RoomId::from_user_input(arg.trim()));
                }
                return Ok(true);
            }
            "pm" if !arg.trim().is_empty() => {
                handle.open_pm(arg.trim())?;
                return Ok(true);
            }
            _ => {}
        }
    }

    let room = current.lock().ok().and_then(|c| c.clone());
    match room {
        Some(room) => handle.submit(&room, line)?,
        None => println!("No room selected. Use /room <room> first."),
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ClientConfig::from_env();
    println!("Connecting to {}...", config.url);
    let mut client = ParleyClient::connect_with(config).await?;
    println!("Connected. Type /help for commands.\n");

    let handle = client.handle();
    let current: CurrentRoom = Arc::new(Mutex::new(None));

    tokio::spawn(print_events(client.subscribe(), current.clone()));

    let room = std::env::var(ROOM_ENV).unwrap_or_else(|_| "lobby".to_string());
    handle.join_room(&room)?;

    let input_handle = handle.clone();
    tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        while let Ok(Some(line)) = lines.next_line().await {
            match handle_input(&line, &input_handle, &current) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => println!("Error: {}", e),
            }
        }

        // Exit when input ends
        std::process::exit(0);
    });

    client.run().await
}
