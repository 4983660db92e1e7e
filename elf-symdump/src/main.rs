#[macro_use]
extern crate log;

use clap::{crate_version, App, Arg, ArgMatches};
use elf_symtab::{dump_symbols, list_sections, ByteSource, DumpOptions, ELF64_SYM_SIZE};
use std::fs::File;
use std::io::BufWriter;
use std::process;

const EXIT_OPEN_FAILURE: i32 = 2;
const EXIT_PARSE_FAILURE: i32 = 3;

fn main() {
    env_logger::init();

    let matches = App::new("elf-symdump")
        .version(crate_version!())
        .about("Print the address and name of every symbol in an ELF64 file")
        .arg(Arg::with_name("file").value_name("FILE").help("ELF64 file to read").required(true).index(1))
        .arg(
            Arg::with_name("sections")
                .long("sections")
                .short("S")
                .help("List section headers instead of symbols"),
        )
        .arg(
            Arg::with_name("strict")
                .long("strict")
                .help("Fail when the symbol table size is not a whole number of entries"),
        )
        .get_matches();

    process::exit(run(&matches));
}

fn run(matches: &ArgMatches) -> i32 {
    let matches_file = matches.value_of("file").unwrap();
    let matches_sections = matches.is_present("sections");
    let options = DumpOptions { strict: matches.is_present("strict") };

    let file = match File::open(matches_file) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("error: cannot open {}: {}", matches_file, err);
            return EXIT_OPEN_FAILURE;
        }
    };
    let mut source = match ByteSource::new(file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read {}: {}", matches_file, err);
            return EXIT_OPEN_FAILURE;
        }
    };
    debug!("{}: {} bytes", matches_file, source.len());

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let result = if matches_sections {
        list_sections(&mut source, &mut out).map(|count| debug!("listed {} sections", count))
    } else {
        dump_symbols(&mut source, &mut out, options).map(|table| {
            if table.is_malformed() {
                eprintln!(
                    "warning: {}: symbol table has {} trailing bytes after {} entries of {} bytes",
                    matches_file,
                    table.trailing_bytes(),
                    table.len(),
                    ELF64_SYM_SIZE
                );
            }
        })
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}: {}", matches_file, err);
            EXIT_PARSE_FAILURE
        }
    }
}
