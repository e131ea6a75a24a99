use std::fmt::Write as _;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use argsmith::{
    ArgumentParser, DefinitionError, Multi, ParseResult, ParserConfig, Single, SlotId, Switch,
};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

/// Handles of every declared destination.
struct Slots {
    name: SlotId<Single<String>>,
    count: SlotId<Single<u32>>,
    tags: SlotId<Multi<String>>,
    color: SlotId<Single<String>>,
    all: SlotId<Switch>,
    verbose: SlotId<Switch>,
    json: SlotId<Switch>,
    fast: SlotId<Switch>,
    slow: SlotId<Switch>,
    output: SlotId<Single<String>>,
    stdout: SlotId<Switch>,
    input: SlotId<Single<String>>,
    rest: SlotId<Multi<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct Values {
    name: Option<String>,
    count: Option<u32>,
    tags: Vec<String>,
    color: Option<String>,
    all: bool,
    verbose: bool,
    speed: Option<&'static str>,
    output: Option<String>,
    stdout: bool,
    input: Option<String>,
    rest: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct Report {
    values: Values,
    #[serde(flatten)]
    result: ParseResult,
}

fn main() -> Result<ExitCode> {
    init_tracing();

    let args = std::env::args_os()
        .skip(1)
        .map(|arg| {
            arg.into_string()
                .map_err(|arg| anyhow!("argument is not valid UTF-8: {}", arg.to_string_lossy()))
        })
        .collect::<Result<Vec<String>>>()?;

    let mut parser = ArgumentParser::with_config(
        ParserConfig::new()
            .program("argsmith-demo")
            .description("Shows how argsmith parses a command line")
            .epilog("Set RUST_LOG=argsmith=trace to follow the tokenizer."),
    );
    let slots = declare(&mut parser).context("failed to declare arguments")?;

    let result = parser
        .parse_args(args.as_slice())
        .context("failed to parse arguments")?;
    tracing::debug!(errors = result.errors.len(), "arguments parsed");

    let as_json = parser.get(slots.json).get();
    let report = Report {
        values: collect(&parser, &slots),
        result,
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report.values, &report.result.free_arguments)?);
        for err in &report.result.errors {
            eprintln!("error: {err}");
        }
    }

    if report.result.is_ok() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}

fn declare(parser: &mut ArgumentParser) -> Result<Slots, DefinitionError> {
    let name = parser
        .add_option(Single::<String>::new(), &["-n", "--name"])?
        .has_argument()?
        .help("Who to greet.")
        .slot();
    let count = parser
        .add_option(Single::<u32>::new(), &["-c", "--count"])?
        .has_argument()?
        .metavar("N")
        .help("How many times.")
        .slot();
    let tags = parser
        .add_option(Multi::<String>::new(), &["-t", "--tag"])?
        .has_argument()?
        .help("Attach a tag; may be repeated.")
        .slot();
    let color = parser
        .add_option(Single::<String>::new(), &["--color"])?
        .maxargs(1)?
        .flag_value("always")
        .choices(["auto", "always", "never"])
        .metavar("WHEN")
        .help("Colorize output: auto, always or never.")
        .slot();
    let all = parser
        .add_option(Switch::new(), &["-a", "--all"])?
        .help("Include everything.")
        .slot();
    let verbose = parser
        .add_option(Switch::new(), &["-v", "--verbose"])?
        .help("Talk more.")
        .slot();
    let json = parser
        .add_option(Switch::new(), &["--json"])?
        .help("Print the report as JSON.")
        .slot();

    parser.add_exclusive_group("Speed")?;
    let fast = parser
        .add_option(Switch::new(), &["--fast"])?
        .help("Go fast.")
        .slot();
    let slow = parser
        .add_option(Switch::new(), &["--slow"])?
        .help("Go slow.")
        .slot();
    parser.end_group();

    parser.add_group("Output")?.required();
    let output = parser
        .add_option(Single::<String>::new(), &["-o", "--output"])?
        .has_argument()?
        .metavar("FILE")
        .help("Write to FILE.")
        .slot();
    let stdout = parser
        .add_option(Switch::new(), &["--stdout"])?
        .help("Write to standard output.")
        .slot();
    parser.end_group();

    let input = parser
        .add_option(Single::<String>::new(), &["input"])?
        .help("File to read.")
        .slot();
    let rest = parser
        .add_option(Multi::<String>::new(), &["rest"])?
        .help("Anything else.")
        .slot();

    Ok(Slots {
        name,
        count,
        tags,
        color,
        all,
        verbose,
        json,
        fast,
        slow,
        output,
        stdout,
        input,
        rest,
    })
}

fn collect(parser: &ArgumentParser, slots: &Slots) -> Values {
    let speed = if parser.get(slots.fast).get() {
        Some("fast")
    } else if parser.get(slots.slow).get() {
        Some("slow")
    } else {
        None
    };

    Values {
        name: parser.get(slots.name).get().cloned(),
        count: parser.get(slots.count).get().copied(),
        tags: parser.get(slots.tags).values().to_vec(),
        color: parser.get(slots.color).get().cloned(),
        all: parser.get(slots.all).get(),
        verbose: parser.get(slots.verbose).get(),
        speed,
        output: parser.get(slots.output).get().cloned(),
        stdout: parser.get(slots.stdout).get(),
        input: parser.get(slots.input).get().cloned(),
        rest: parser.get(slots.rest).values().to_vec(),
    }
}

fn render_text(values: &Values, free: &[String]) -> Result<String> {
    fn or_dash(value: Option<&str>) -> &str {
        value.unwrap_or("-")
    }

    let mut out = String::new();
    writeln!(out, "name: {}", or_dash(values.name.as_deref()))?;
    match values.count {
        Some(count) => writeln!(out, "count: {count}")?,
        None => writeln!(out, "count: -")?,
    }
    writeln!(out, "tags: {}", values.tags.join(", "))?;
    writeln!(out, "color: {}", or_dash(values.color.as_deref()))?;
    writeln!(out, "all: {}", values.all)?;
    writeln!(out, "verbose: {}", values.verbose)?;
    writeln!(out, "speed: {}", or_dash(values.speed))?;
    writeln!(out, "output: {}", or_dash(values.output.as_deref()))?;
    writeln!(out, "stdout: {}", values.stdout)?;
    writeln!(out, "input: {}", or_dash(values.input.as_deref()))?;
    writeln!(out, "rest: {}", values.rest.join(" "))?;
    if !free.is_empty() {
        writeln!(out, "free arguments: {}", free.join(" "))?;
    }
    Ok(out)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
