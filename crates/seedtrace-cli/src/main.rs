use chrono::Local;
use seedtrace_cli::{build_cli, init_tracing, run};

fn main() {
    let matches = build_cli().get_matches();

    let log_json = matches.get_flag("log-json")
        || matches
            .subcommand()
            .is_some_and(|(_, args)| args.get_flag("log-json"));
    init_tracing(log_json);

    match run(&matches, &Local::now()) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            tracing::error!("{:#}", err);
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
