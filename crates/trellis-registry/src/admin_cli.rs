//! trellis-admin CLI tool
//!
//! Inspects the member tree of a running Trellis node.
//!
//! Usage:
//!   trellis-admin stats
//!   trellis-admin show <member_code>
//!   trellis-admin verify-sponsor <member_code>
//!   trellis-admin downline <member_code>
//!   trellis-admin upline <member_code>
//!   trellis-admin ping

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use trellis_registry::admin_socket::{default_socket_path, AdminCommand, AdminResponse};
use trellis_registry::models::DownlineEntry;

fn print_usage() {
    eprintln!("trellis-admin - Inspect a Trellis node's member tree");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  trellis-admin stats                    Member count and root");
    eprintln!("  trellis-admin show <code>              Show a member");
    eprintln!("  trellis-admin verify-sponsor <code>    Show free slots of a sponsor");
    eprintln!("  trellis-admin downline <code>          List a member's subtrees");
    eprintln!("  trellis-admin upline <code>            List placement parents up to the root");
    eprintln!("  trellis-admin ping                     Check if daemon is running");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRELLIS_SOCKET  Path to admin socket (default: ./trellis-data/admin.sock)");
}

fn get_socket_path() -> PathBuf {
    std::env::var("TRELLIS_SOCKET")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_socket_path())
}

fn send_command(cmd: AdminCommand) -> Result<AdminResponse, String> {
    let socket_path = get_socket_path();

    let mut stream = UnixStream::connect(&socket_path).map_err(|e| {
        format!(
            "Failed to connect to trellis-node at {:?}: {}\n\
             Is the trellis-node running?",
            socket_path, e
        )
    })?;

    // Send command
    let cmd_json = serde_json::to_string(&cmd).map_err(|e| e.to_string())?;
    writeln!(stream, "{}", cmd_json).map_err(|e| e.to_string())?;

    // Read response
    let mut reader = BufReader::new(&stream);
    let mut response_line = String::new();
    reader
        .read_line(&mut response_line)
        .map_err(|e| e.to_string())?;

    serde_json::from_str(&response_line).map_err(|e| format!("Invalid response: {}", e))
}

fn code_arg(args: &[String], cmd: &str) -> String {
    match args.get(2) {
        Some(code) => code.clone(),
        None => {
            eprintln!("Error: {} requires a member_code argument", cmd);
            std::process::exit(1);
        }
    }
}

fn print_entries(label: &str, entries: &[DownlineEntry]) {
    println!("{} ({}):", label, entries.len());
    if entries.is_empty() {
        println!("  (none)");
    }
    for e in entries {
        let side = e.position.map(|s| s.as_str()).unwrap_or("root");
        println!(
            "  {}  {:<5}  L{} R{}  {}",
            e.member_code, side, e.left_count, e.right_count, e.name
        );
    }
}

fn print_slot(label: &str, filled: bool, depth: Option<usize>) {
    let state = if filled { "filled" } else { "open" };
    match depth {
        Some(depth) => println!("  {:<6} {} (spills {} deep)", label, state, depth),
        None => println!("  {:<6} {} (malformed chain)", label, state),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let cmd = match args[1].as_str() {
        "stats" => AdminCommand::Stats,
        "show" => AdminCommand::Show {
            code: code_arg(&args, "show"),
        },
        "verify-sponsor" => AdminCommand::VerifySponsor {
            code: code_arg(&args, "verify-sponsor"),
        },
        "downline" => AdminCommand::Downline {
            code: code_arg(&args, "downline"),
        },
        "upline" => AdminCommand::Upline {
            code: code_arg(&args, "upline"),
        },
        "ping" => AdminCommand::Ping,
        "-h" | "--help" | "help" => {
            print_usage();
            std::process::exit(0);
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
    };

    match send_command(cmd) {
        Ok(response) => match response {
            AdminResponse::Error { error } => {
                eprintln!("Error: {}", error);
                std::process::exit(1);
            }
            AdminResponse::Stats { stats } => {
                println!("members:   {}", stats.members);
                println!("root:      {}", stats.root.as_deref().unwrap_or("(none)"));
                println!("next code: {}", stats.next_code);
            }
            AdminResponse::Member { member } => {
                match serde_json::to_string_pretty(&member) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            }
            AdminResponse::Sponsor { sponsor } => {
                println!("{} ({})", sponsor.member_code, sponsor.name);
                print_slot("left", sponsor.left_filled, sponsor.left_depth);
                print_slot("right", sponsor.right_filled, sponsor.right_depth);
            }
            AdminResponse::Downline { downline } => {
                println!(
                    "total left: {}  total right: {}",
                    downline.total_left, downline.total_right
                );
                print_entries("left", &downline.left_downline);
                print_entries("right", &downline.right_downline);
            }
            AdminResponse::Upline { upline } => {
                if upline.is_empty() {
                    println!("(root)");
                }
                for code in upline {
                    println!("{}", code);
                }
            }
            AdminResponse::Pong => {
                println!("pong - trellis-node is running");
            }
        },
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
