use std::io::{self, Read};

use chrono::NaiveDateTime;
use tempora::{
    Context, NaiveBayesScorer, Options, Scorer, corpus, parse_stream_with_scorer, run_corpus,
    train_naive_bayes,
};

fn main() {
    env_logger::init();
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Some(path) = &config.train {
        if let Err(err) = train(path) {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
        return;
    }

    let input = match config.input.clone() {
        Some(value) => value,
        None => match read_stdin_input() {
            Ok(value) => value,
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(2);
            }
        },
    };
    if input.trim().is_empty() {
        eprintln!("error: no input provided\n\n{}", help_text());
        std::process::exit(2);
    }

    let scorer: Box<dyn Scorer> = match &config.model {
        Some(path) => match NaiveBayesScorer::from_model_file(path) {
            Ok(scorer) => Box::new(scorer),
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        },
        None => Box::new(tempora::DummyScorer),
    };

    let context = match config.reference_time {
        Some(reference_time) => Context { reference_time },
        None => Context::default(),
    };
    let options = Options {
        timeout: config.timeout,
        max_stack_depth: config.depth,
        latent_time: !config.no_latent,
        ..Options::default()
    };

    let mut produced = 0;
    let mut best = None;
    for parse in parse_stream_with_scorer(&input, &context, &options, scorer.as_ref()) {
        if config.all {
            println!("{parse}");
        }
        let better = best.as_ref().is_none_or(|b: &tempora::Parse| parse.score >= b.score);
        if better {
            best = Some(parse);
        }
        produced += 1;
    }

    match best {
        Some(parse) if config.all => {
            println!("-- best of {produced}: {parse}");
        }
        Some(parse) => println!("{parse}"),
        None => {
            eprintln!("no result for {input:?}");
            std::process::exit(1);
        }
    }
}

fn train(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let data = run_corpus(corpus())?;
    println!(
        "corpus: {} texts, {} positive / {} negative parses",
        data.stats.total_tests, data.stats.pos_parses, data.stats.neg_parses
    );
    let model = train_naive_bayes(&data.x, &data.y);
    NaiveBayesScorer::new(model).save_model_file(path)?;
    println!("model written to {path}");
    Ok(())
}

struct CliConfig {
    input: Option<String>,
    reference_time: Option<NaiveDateTime>,
    timeout: f64,
    depth: usize,
    all: bool,
    no_latent: bool,
    model: Option<String>,
    train: Option<String>,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut config = CliConfig {
        input: None,
        reference_time: None,
        timeout: 1.0,
        depth: 10,
        all: false,
        no_latent: false,
        model: None,
        train: None,
    };
    let mut args = std::env::args().skip(1);

    let set_input = |input: String, config: &mut CliConfig| -> Result<(), String> {
        if config.input.is_some() {
            return Err("error: input provided multiple times".to_string());
        }
        config.input = Some(input);
        Ok(())
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("tempora {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--all" => config.all = true,
            "--no-latent" => config.no_latent = true,
            "--reference" => {
                let value = expect_value(&mut args, "--reference")?;
                config.reference_time = Some(parse_reference(&value)?);
            }
            "--timeout" => {
                let value = expect_value(&mut args, "--timeout")?;
                config.timeout = value
                    .parse()
                    .map_err(|_| format!("error: invalid --timeout '{value}'"))?;
            }
            "--depth" => {
                let value = expect_value(&mut args, "--depth")?;
                config.depth = value
                    .parse()
                    .map_err(|_| format!("error: invalid --depth '{value}'"))?;
            }
            "--model" => config.model = Some(expect_value(&mut args, "--model")?),
            "--train" => config.train = Some(expect_value(&mut args, "--train")?),
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    set_input(rest, &mut config)?;
                }
                break;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                set_input(rest, &mut config)?;
                break;
            }
        }
    }

    Ok(config)
}

fn expect_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("error: {flag} expects a value"))
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn parse_reference(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .map_err(|_| format!("error: invalid --reference '{value}' (expected YYYY-MM-DDTHH:MM[:SS])"))
}

fn help_text() -> String {
    format!(
        "tempora {version}

Parse natural-language time expressions (English/German).

Usage:
  tempora [OPTIONS] [--] <input...>
  tempora --train <path>

Options:
  --reference <timestamp>    Reference time, YYYY-MM-DDTHH:MM[:SS].
                             Default: the current local time.
  --timeout <seconds>        Parse budget; 0 disables it. Default: 1.0.
  --depth <n>                Beam depth; 0 means unbounded. Default: 10.
  --model <path>             Scorer model file to rank candidates with.
  --all                      Print every candidate, not just the best one.
  --no-latent                Do not anchor date-less times to the reference.
  --train <path>             Run the built-in corpus, train the scorer and
                             write the model to <path>.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  No result or internal error.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
