use std::ffi::OsString;
use std::io::{self, BufRead, ErrorKind, Write};
use std::path::PathBuf;

use basket::config::{check_unit, resolve_data_dir, OutputFormat, Thresholds};
use basket::dataset::{DatasetSpec, CATALOGUE};
use basket::fp::FpGrowth;
use basket::harness::compare;
use basket::report;
use basket::BasketError;
use tracing_subscriber::EnvFilter;

const BANNER_WIDTH: usize = 60;
const DATASET_PROMPT: &str = "\nSelect a dataset (1-5): ";
const SUPPORT_PROMPT: &str = "\nEnter minimum support threshold (0-1): ";
const CONFIDENCE_PROMPT: &str = "\nEnter minimum confidence threshold (0-1): ";

#[derive(Debug, Clone, PartialEq, Default)]
struct CliOptions {
    dataset: Option<&'static DatasetSpec>,
    min_support: Option<f64>,
    min_confidence: Option<f64>,
    data_dir: Option<PathBuf>,
    format: OutputFormat,
    show_help: bool,
}

impl CliOptions {
    fn is_complete(&self) -> bool {
        self.dataset.is_some() && self.min_support.is_some() && self.min_confidence.is_some()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    let code = run(std::env::args_os(), &mut input, &mut stdout, &mut stderr);
    drop(input);
    if code != 0 {
        std::process::exit(code);
    }
}

/// Prompts and progress go to stdout, or to stderr when stdout carries JSON.
fn console<'a, W: Write, E: Write>(
    format: OutputFormat,
    out: &'a mut W,
    err: &'a mut E,
) -> &'a mut dyn Write {
    match format {
        OutputFormat::Text => out,
        OutputFormat::Json => err,
    }
}

fn run<I, R, W, E>(args: I, input: &mut R, out: &mut W, err: &mut E) -> i32
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
{
    let options = match parse_args(args) {
        Ok(options) => options,
        Err(message) => {
            let _ = writeln!(err, "error: {message}");
            let _ = write_usage(err);
            return 2;
        }
    };

    if options.show_help {
        if write_usage(out).is_err() {
            return 1;
        }
        return 0;
    }

    let selection = collect_inputs(&options, input, console(options.format, out, err));
    let (spec, thresholds) = match selection {
        Ok(selection) => selection,
        Err(error) => {
            let _ = writeln!(err, "\nerror: {error}");
            return 1;
        }
    };

    let data_dir = resolve_data_dir(options.data_dir.clone());
    let _ = writeln!(
        console(options.format, out, err),
        "{}\n\nAnalyzing {} dataset with min_support={} and min_confidence={}",
        "=".repeat(BANNER_WIDTH),
        spec.name,
        thresholds.min_support,
        thresholds.min_confidence
    );

    let store = match spec.load(&data_dir) {
        Ok(store) => store,
        Err(BasketError::MissingDataFile { path }) => {
            let _ = writeln!(
                err,
                "Error: Cannot find data files for {} ({}).",
                spec.name,
                path.display()
            );
            return 1;
        }
        Err(error) => {
            let _ = writeln!(err, "error: {error}");
            return exit_code(&error);
        }
    };

    let _ = writeln!(
        console(options.format, out, err),
        "Loaded {} items and {} transactions.\n\nBrute Force algorithm:\nRunning FP-Growth algorithm:",
        store.catalogue_len(),
        store.len()
    );

    let comparison = match compare(&store, thresholds, &FpGrowth) {
        Ok(comparison) => comparison,
        Err(error) => {
            let _ = writeln!(err, "error: {error}");
            return exit_code(&error);
        }
    };

    let written = match options.format {
        OutputFormat::Text => report::write_text(out, &store, &comparison).map_err(BasketError::from),
        OutputFormat::Json => report::write_json(out, &store, &comparison),
    };
    match written {
        Ok(()) => 0,
        Err(error) => {
            let _ = writeln!(err, "error: {error}");
            1
        }
    }
}

fn exit_code(error: &BasketError) -> i32 {
    if error.is_usage_error() {
        2
    } else {
        1
    }
}

fn collect_inputs<R: BufRead>(
    options: &CliOptions,
    input: &mut R,
    console: &mut dyn Write,
) -> io::Result<(&'static DatasetSpec, Thresholds)> {
    if !options.is_complete() {
        write_banner(console)?;
    }

    let spec = match options.dataset {
        Some(spec) => spec,
        None => prompt_dataset(input, console)?,
    };
    let min_support = match options.min_support {
        Some(value) => value,
        None => prompt_threshold(input, console, SUPPORT_PROMPT, "min_support", "Support")?,
    };
    let min_confidence = match options.min_confidence {
        Some(value) => value,
        None => prompt_threshold(
            input,
            console,
            CONFIDENCE_PROMPT,
            "min_confidence",
            "Confidence",
        )?,
    };

    let thresholds = Thresholds::new(min_support, min_confidence)
        .map_err(|error| io::Error::new(ErrorKind::InvalidInput, error.to_string()))?;
    Ok((spec, thresholds))
}

fn write_banner(console: &mut dyn Write) -> io::Result<()> {
    let rule = "=".repeat(BANNER_WIDTH);
    writeln!(console, "{rule}\nAssociation Rule Mining - Comparison of Algorithms\n{rule}")?;
    writeln!(console, "\nAvailable datasets:")?;
    for spec in CATALOGUE.iter() {
        writeln!(console, "{}. {}", spec.choice, spec.name)?;
    }
    Ok(())
}

/// One trimmed answer. Fails on end of input; retries interrupted reads.
fn prompt_line<R: BufRead>(
    input: &mut R,
    console: &mut dyn Write,
    prompt: &str,
) -> io::Result<String> {
    loop {
        write!(console, "{prompt}")?;
        console.flush()?;

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "input ended before a value was entered",
                ))
            }
            Ok(_) => return Ok(line.trim().to_owned()),
            Err(error) if error.kind() == ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        }
    }
}

fn prompt_dataset<R: BufRead>(
    input: &mut R,
    console: &mut dyn Write,
) -> io::Result<&'static DatasetSpec> {
    loop {
        let answer = prompt_line(input, console, DATASET_PROMPT)?;
        match DatasetSpec::by_choice(&answer) {
            Ok(spec) => return Ok(spec),
            Err(_) => writeln!(
                console,
                "******Invalid choice! Please enter a number between 1 and 5."
            )?,
        }
    }
}

fn prompt_threshold<R: BufRead>(
    input: &mut R,
    console: &mut dyn Write,
    prompt: &str,
    name: &'static str,
    label: &str,
) -> io::Result<f64> {
    loop {
        let answer = prompt_line(input, console, prompt)?;
        match answer.parse::<f64>() {
            Ok(value) if check_unit(name, value).is_ok() => return Ok(value),
            Ok(_) => writeln!(
                console,
                "******Invalid input! {label} must be between 0 and 1."
            )?,
            Err(_) => writeln!(
                console,
                "******Invalid input! Please enter a decimal number between 0 and 1."
            )?,
        }
    }
}

fn parse_unit(value: &str, name: &'static str) -> Result<f64, String> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("`{value}` is not a decimal number"))?;
    check_unit(name, parsed).map_err(|error| error.to_string())
}

fn parse_args<I>(args: I) -> Result<CliOptions, String>
where
    I: IntoIterator<Item = OsString>,
{
    let mut iter = args.into_iter();
    let _argv0 = iter.next();
    let mut options = CliOptions::default();

    while let Some(argument) = iter.next() {
        let arg = argument.to_string_lossy().into_owned();
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_owned(), Some(value.to_owned())),
            _ => (arg.clone(), None),
        };

        let mut value = |name: &str| -> Result<String, String> {
            match inline.clone() {
                Some(value) => Ok(value),
                None => iter
                    .next()
                    .map(|value| value.to_string_lossy().into_owned())
                    .ok_or_else(|| format!("missing value for `{name}`")),
            }
        };

        match flag.as_str() {
            "-h" | "--help" => options.show_help = true,
            "-d" | "--dataset" => {
                let choice = value("--dataset")?;
                let spec = DatasetSpec::by_choice(&choice).map_err(|error| error.to_string())?;
                options.dataset = Some(spec);
            }
            "-s" | "--min-support" => {
                options.min_support = Some(parse_unit(&value("--min-support")?, "min_support")?);
            }
            "-c" | "--min-confidence" => {
                options.min_confidence =
                    Some(parse_unit(&value("--min-confidence")?, "min_confidence")?);
            }
            "--data-dir" => options.data_dir = Some(PathBuf::from(value("--data-dir")?)),
            "--format" => options.format = value("--format")?.parse()?,
            other => return Err(format!("unknown option `{other}`")),
        }
    }

    Ok(options)
}

fn write_usage<W>(out: &mut W) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        out,
        "Usage: basket [-d|--dataset N] [-s|--min-support S] [-c|--min-confidence C]\n\
         \x20             [--data-dir DIR] [--format text|json]\n\
         \n\
         Values not given as flags are prompted for.\n\
         Datasets: 1 Amazon, 2 K-mart, 3 Best Buy, 4 Nike, 5 Walmart.\n\
         DIR defaults to $BASKET_DATA_DIR, then ./dataset.\n\
         \n\
         Examples:\n\
         \n\
         basket\n\
         basket --dataset 1 --min-support 0.2 --min-confidence 0.5\n\
         basket -d 5 -s 0.3 -c 0.6 --format json\n",
    )
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;

    use super::{parse_args, run, CliOptions, OutputFormat};

    fn parse_from(args: &[&str]) -> Result<CliOptions, String> {
        let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
        parse_args(os_args)
    }

    fn write_amazon(dir: &Path) {
        fs::write(
            dir.join("amazon_items.csv"),
            "Item #,Item Name\n1,Milk\n2,Bread\n3,Eggs\n",
        )
        .unwrap();
        fs::write(
            dir.join("amazon_transactions.csv"),
            "Transaction ID,Transaction\n\
             Trans1,\"Milk, Bread\"\n\
             Trans2,\"Milk, Bread, Eggs\"\n\
             Trans3,Milk\n\
             Trans4,\"Bread, Eggs\"\n",
        )
        .unwrap();
    }

    fn run_with(args: &[&str], stdin: &str) -> (i32, String, String) {
        let mut input = Cursor::new(stdin.as_bytes().to_vec());
        let mut out = Vec::new();
        let mut err = Vec::new();
        let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();

        let code = run(os_args, &mut input, &mut out, &mut err);
        (
            code,
            String::from_utf8(out).expect("stdout should be utf-8"),
            String::from_utf8(err).expect("stderr should be utf-8"),
        )
    }

    #[test]
    fn test_parse_defaults() {
        let options = parse_from(&["basket"]).expect("default args should parse");
        assert_eq!(options, CliOptions::default());
        assert!(!options.is_complete());
    }

    #[test]
    fn test_parse_all_flags() {
        let options = parse_from(&[
            "basket",
            "-d",
            "3",
            "--min-support=0.25",
            "-c",
            "0.5",
            "--format",
            "json",
            "--data-dir=/tmp/data",
        ])
        .expect("args should parse");

        assert_eq!(options.dataset.map(|spec| spec.name), Some("Best Buy"));
        assert_eq!(options.min_support, Some(0.25));
        assert_eq!(options.min_confidence, Some(0.5));
        assert_eq!(options.format, OutputFormat::Json);
        assert!(options.is_complete());
    }

    #[test]
    fn test_parse_rejects_out_of_range_threshold() {
        let err = parse_from(&["basket", "--min-support", "1.5"]).unwrap_err();
        assert!(err.contains("min_support"), "got: {err}");

        let err = parse_from(&["basket", "-c", "abc"]).unwrap_err();
        assert!(err.contains("not a decimal number"), "got: {err}");
    }

    #[test]
    fn test_parse_rejects_unknown_dataset_and_option() {
        assert!(parse_from(&["basket", "--dataset", "9"]).is_err());
        assert!(parse_from(&["basket", "--verbose"]).is_err());
        assert!(parse_from(&["basket", "--dataset"]).is_err());
    }

    #[test]
    fn test_usage_error_exit_code() {
        let (code, _, err) = run_with(&["basket", "--bogus"], "");
        assert_eq!(code, 2);
        assert!(err.contains("Usage: basket"));
    }

    #[test]
    fn test_help() {
        let (code, out, _) = run_with(&["basket", "--help"], "");
        assert_eq!(code, 0);
        assert!(out.contains("--min-confidence"));
    }

    #[test]
    fn test_interactive_session_reprompts() {
        let dir = tempfile::tempdir().unwrap();
        write_amazon(dir.path());
        let data_dir = dir.path().to_string_lossy().into_owned();

        let (code, out, err) = run_with(
            &["basket", "--data-dir", &data_dir],
            "7\n1\nlots\n2\n0.5\n0.66\n",
        );

        assert_eq!(code, 0, "stderr: {err}");
        assert!(out.contains("Available datasets:"));
        assert!(out.contains("******Invalid choice!"));
        assert!(out.contains("Please enter a decimal number between 0 and 1."));
        assert!(out.contains("Support must be between 0 and 1."));
        assert!(out.contains("Analyzing Amazon dataset with min_support=0.5 and min_confidence=0.66"));
        assert!(out.contains("Loaded 3 items and 4 transactions."));
        assert!(out.contains("{Eggs} => {Bread}"));
        assert!(out.contains("Both algorithms produced the same number of results!"));
    }

    #[test]
    fn test_flags_skip_prompts() {
        let dir = tempfile::tempdir().unwrap();
        write_amazon(dir.path());
        let data_dir = dir.path().to_string_lossy().into_owned();

        let (code, out, _) = run_with(
            &["basket", "-d", "1", "-s", "0.5", "-c", "0.5", "--data-dir", &data_dir],
            "",
        );

        assert_eq!(code, 0);
        assert!(!out.contains("Available datasets:"));
        assert!(out.contains("=== Performance Comparison ==="));
    }

    #[test]
    fn test_unreachable_reference_still_reports_brute_force() {
        let dir = tempfile::tempdir().unwrap();
        write_amazon(dir.path());
        let data_dir = dir.path().to_string_lossy().into_owned();

        let (code, out, _) = run_with(
            &["basket", "-d", "1", "-s", "0.9", "-c", "0.5", "--data-dir", &data_dir],
            "",
        );

        assert_eq!(code, 0);
        assert!(out.contains("=== Brute Force Algorithm Results ==="));
        assert!(out.contains("Couldn't find required association"));
    }

    #[test]
    fn test_zero_support_skips_reference_comparison() {
        let dir = tempfile::tempdir().unwrap();
        write_amazon(dir.path());
        let data_dir = dir.path().to_string_lossy().into_owned();

        let (code, out, _) = run_with(
            &["basket", "-d", "1", "-s", "0", "-c", "0.5", "--data-dir", &data_dir],
            "",
        );

        assert_eq!(code, 0);
        assert!(out.contains("{Bread, Eggs, Milk}"));
        assert!(out.contains("Couldn't find required association"));
        assert!(!out.contains("Results differ"));
        assert!(!out.contains("=== Performance Comparison ==="));
    }

    #[test]
    fn test_json_output_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        write_amazon(dir.path());
        let data_dir = dir.path().to_string_lossy().into_owned();

        let (code, out, err) = run_with(
            &["basket", "--data-dir", &data_dir, "--format", "json"],
            "1\n0.5\n0.66\n",
        );

        assert_eq!(code, 0, "stderr: {err}");
        let value: serde_json::Value = serde_json::from_str(&out).expect("stdout should be JSON");
        assert_eq!(value["counts_match"], true);
        assert!(err.contains("Select a dataset"));
    }

    #[test]
    fn test_missing_data_files() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_string_lossy().into_owned();

        let (code, _, err) = run_with(
            &["basket", "-d", "4", "-s", "0.5", "-c", "0.5", "--data-dir", &data_dir],
            "",
        );

        assert_eq!(code, 1);
        assert!(err.contains("Cannot find data files for Nike"));
    }

    #[test]
    fn test_end_of_input_fails() {
        let (code, _, err) = run_with(&["basket"], "1\n");
        assert_eq!(code, 1);
        assert!(err.contains("input ended"));
    }
}
