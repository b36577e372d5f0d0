use std::{
  io,
  ptr::NonNull,
};

use anyhow::{
  Context,
  anyhow,
  ensure,
};
use clap::Parser;

use bitbuddy::{
  Buddy,
  Field,
  FieldWord,
};
use bitbuddy_sys::arena::Arena;

mod repl;

#[derive(Parser)]
#[command(
  name = "bitbuddy",
  about = "Interactive driver for the bitfield-resident buddy allocator",
  version
)]
struct Cli {
  /// Arena size in bytes; must be a power of two
  size: usize,

  /// Number of tree levels
  #[arg(long, default_value_t = 4)]
  levels: usize,
}

fn main() {
  let cli = Cli::parse();
  if let Err(err) = run(cli) {
    eprintln!("{err:#}");
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> anyhow::Result<()> {
  ensure!(
    (1..=32).contains(&cli.levels),
    "levels must be within 1..=32, got {}",
    cli.levels
  );
  ensure!(
    cli.size.is_power_of_two(),
    "arena size must be a power of two, got {}",
    cli.size
  );

  let mut arena = Arena::new(cli.size)
    .map_err(|err| anyhow!("mapping a {} byte arena failed: {err:?}", cli.size))?;

  let cells = Buddy::cells(cli.levels);
  let store: Vec<FieldWord> = (0..Field::bytes(cells)).map(|_| FieldWord::new(0)).collect();

  let base = NonNull::new(arena.as_mut().as_mut_ptr()).context("arena base is null")?;
  let mut buddy = Buddy::new(base, cli.size, cli.levels, &store)
    .map_err(|err| anyhow!("allocator construction failed: {err:?}"))?;

  let stdin = io::stdin();
  let stdout = io::stdout();
  repl::run(&mut buddy, stdin.lock(), stdout.lock())
}
