use std::process::ExitCode;

use gridpair::{parse_grid, solve, solve_naive};
use log::{error, info};

fn init_logger() {
    fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!("[{}] {}", record.level(), message)))
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .apply()
        .unwrap();
}

fn main() -> ExitCode {
    init_logger();

    let Some(path) = std::env::args().nth(1) else {
        error!("usage: solver <grid-file>");
        return ExitCode::FAILURE;
    };

    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            error!("cannot read {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    let grid = match parse_grid(&text) {
        Ok(grid) => grid,
        Err(e) => {
            error!("{}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    print!("{}", grid);

    let naive = solve_naive(&grid);
    info!("greedy baseline scores {} with {} pairs", naive.score, naive.pairs.len());

    match solve(&grid) {
        Ok(solution) => {
            for pair in &solution.pairs {
                info!("pair {} -- {}", pair.0, pair.1);
            }
            info!("optimal pairing scores {} with {} pairs", solution.score, solution.pairs.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("solve aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
