// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;

use std::io;
use std::process;
use std::time::Instant;

use chess_clash::perft::{divide, perft};
use chess_clash::progress::FileStore;
use chess_clash::{share, ConsoleServer, GameState};
use clap::{App, Arg, ArgMatches, SubCommand};

const DEFAULT_STORE: &str = ".chess-clash";

fn main() {
    env_logger::init();
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .arg(
            Arg::with_name("store")
                .help("Directory the player's progress is saved in")
                .value_name("DIR")
                .long("--store")
                .takes_value(true)
                .default_value(DEFAULT_STORE),
        )
        .subcommand(
            SubCommand::with_name("perft")
                .about("Counts the legal move tree of a position")
                .arg(
                    Arg::with_name("fen")
                        .help("FEN string for the position (defaults to the starting position)")
                        .value_name("FEN")
                        .long("--fen")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("depth")
                        .help("Depth of move tree to search")
                        .value_name("DEPTH")
                        .short("-d")
                        .long("--depth")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("divide")
                        .help("Prints the count under each root move")
                        .long("--divide"),
                ),
        )
        .subcommand(
            SubCommand::with_name("replay")
                .about("Rebuilds a game from a share link and prints it")
                .arg(
                    Arg::with_name("PAYLOAD")
                        .help("Share payload, or a full link ending in #<payload>")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("perft") {
        run_perft(matches);
    }

    if let Some(matches) = matches.subcommand_matches("replay") {
        run_replay(matches);
    }

    let store = FileStore::new(matches.value_of("store").unwrap_or(DEFAULT_STORE));
    let mut console = ConsoleServer::new(store);
    let stdin = io::stdin();
    if let Err(err) = console.run(stdin.lock(), io::stdout()) {
        eprintln!("console failed: {}", err);
        process::exit(1);
    }
}

fn run_perft(matches: &ArgMatches) -> ! {
    let depth = value_t_or_exit!(matches, "depth", u32);
    let state = match matches.value_of("fen") {
        Some(fen) => match GameState::from_fen(fen) {
            Ok(state) => state,
            Err(err) => {
                println!("invalid fen: {:?}", err);
                process::exit(1);
            }
        },
        None => GameState::new(),
    };

    println!("depth: {}", depth);
    println!();
    println!("{}", state);

    if matches.is_present("divide") {
        let mut total = 0;
        for (mov, count) in divide(&state, depth) {
            println!("{}: {}", mov, count);
            total += count;
        }

        println!();
        println!("total: {}", total);
        process::exit(0);
    }

    for i in 1..depth + 1 {
        let start = Instant::now();
        let results = perft(&state, i);
        let ms = start.elapsed().as_millis();
        println!("perft({}) = {} ({} ms)", i, results, ms);
    }

    process::exit(0);
}

fn run_replay(matches: &ArgMatches) -> ! {
    let payload = matches.value_of("PAYLOAD").unwrap_or_default();
    let state = share::decode(payload);
    println!("{}", state);
    println!("moves: {}", share::to_tokens(state.history()));
    process::exit(0);
}
