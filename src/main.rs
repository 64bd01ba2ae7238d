use std::io::{self, Read};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::{debug, error};

use curl2ffuf::{apply_env, convert, load_config, ConvertOptions, ErrorKind};

#[derive(Debug, Parser)]
#[command(name = "curl2ffuf")]
#[command(
    version,
    about = "Convert a curl command into an ffuf command (GET/POST + headers + cookies + body).",
    long_about = "Convert a curl command into an ffuf command (GET/POST + headers + cookies + body).\n\nExamples:\n  curl2ffuf \"curl 'https://target.tld/search?q=1' -H 'Cookie: s=1'\"\n  curl2ffuf -p user -w users.txt \"curl https://target.tld/login -d 'user=a&pass=b'\"\n  pbpaste | curl2ffuf -\n\nDefaults can be set in ~/.curl2ffufrc (wordlist = ..., param = ...) or with\nCURL2FFUF_WORDLIST / CURL2FFUF_PARAM."
)]
struct Args {
    /// Full curl command (wrap in quotes); read from stdin when omitted or "-"
    curl: Option<String>,

    /// ffuf wordlist (default: wordlist.txt)
    #[arg(short, long)]
    wordlist: Option<String>,

    /// Parameter name to fuzz (default: first parameter)
    #[arg(short, long)]
    param: Option<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Ignore ~/.curl2ffufrc and CURL2FFUF_* variables
    #[arg(long)]
    no_config: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let options = match build_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::from(1);
        }
    };

    let command = match read_command(args.curl.as_deref()) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: failed to read curl command: {err}");
            return ExitCode::from(1);
        }
    };

    match convert(&command, &options) {
        Ok(ffuf) => {
            println!("{ffuf}");
            ExitCode::SUCCESS
        }
        Err(err) if err.kind == ErrorKind::MissingUrl => {
            eprintln!("[-] No URL found in curl command");
            ExitCode::from(1)
        }
        Err(err) if err.kind == ErrorKind::Parse => {
            eprintln!("{}", err.display_with_input(&command));
            ExitCode::from(2)
        }
        Err(err) => {
            error!("convert event=failed kind={:?}", err.kind);
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env = env_logger::Env::default().filter_or("CURL2FFUF_LOG", level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}

fn build_options(args: &Args) -> io::Result<ConvertOptions> {
    let mut options = ConvertOptions::default();
    if !args.no_config {
        load_config(&mut options)?;
        apply_env(&mut options);
    }
    if let Some(ref wordlist) = args.wordlist {
        options.wordlist = wordlist.clone();
    }
    if let Some(ref param) = args.param {
        options.param = Some(param.clone());
    }
    debug!(
        "config event=resolved wordlist={} param={:?}",
        options.wordlist, options.param
    );
    Ok(options)
}

fn read_command(arg: Option<&str>) -> io::Result<String> {
    match arg {
        Some(command) if command != "-" => Ok(command.to_string()),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
