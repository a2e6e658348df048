//! Command line definition and conversion of arguments into jobs

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgGroup, ArgMatches, Command};
use coder_order::{MethodQuery, Value};
use coder_php::{parse_fragment, Job};
use coder_syntax::{ArrayPath, Visibility};
use std::path::PathBuf;

const VALUE_FLAGS: [&str; 7] = ["null", "bool", "int", "float", "string", "class", "code"];

/// Build the `coder` command
#[must_use]
pub fn build_cli() -> Command {
    Command::new("coder")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Insert values into PHP array literals, keeping them sorted and free of duplicates")
        .subcommand_required(true)
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Report results without writing files"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print the report as JSON"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More logging (-v info, -vv debug)"),
        )
        .subcommand(
            value_args(
                Command::new("property")
                    .about("Insert into the array a class property is initialized with")
                    .arg(file_arg())
                    .arg(Arg::new("property").required(true).help("Property name, with or without '$'")),
            ),
        )
        .subcommand(
            value_args(
                Command::new("return")
                    .about("Insert into the array a method returns")
                    .arg(file_arg())
                    .arg(Arg::new("method").required(true).help("Method name"))
                    .arg(
                        Arg::new("visibility")
                            .long("visibility")
                            .value_parser(["public", "protected", "private"])
                            .help("Only match methods with this visibility"),
                    )
                    .arg(
                        Arg::new("static")
                            .long("static")
                            .value_parser(value_parser!(bool))
                            .help("Only match static (true) or instance (false) methods"),
                    )
                    .arg(
                        Arg::new("parameters")
                            .long("parameters")
                            .num_args(0..)
                            .help("Only match methods with exactly these parameter names"),
                    ),
            ),
        )
        .subcommand(
            Command::new("batch").about("Run jobs from a TOML file").arg(
                Arg::new("jobs")
                    .required(true)
                    .value_parser(value_parser!(PathBuf))
                    .help("Job file"),
            ),
        )
}

fn file_arg() -> Arg {
    Arg::new("file")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("PHP file to edit")
}

fn value_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("path")
                .long("path")
                .default_value("")
                .help("Dot-separated keys from the target array to the receiving array"),
        )
        .arg(Arg::new("null").long("null").action(ArgAction::SetTrue).help("Insert null"))
        .arg(
            Arg::new("bool")
                .long("bool")
                .value_parser(value_parser!(bool))
                .help("Insert a boolean"),
        )
        .arg(
            Arg::new("int")
                .long("int")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64))
                .help("Insert an integer"),
        )
        .arg(
            Arg::new("float")
                .long("float")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f64))
                .help("Insert a float"),
        )
        .arg(Arg::new("string").long("string").help("Insert a string"))
        .arg(Arg::new("class").long("class").help("Insert Class::class, or Class::CONSTANT with --constant"))
        .arg(
            Arg::new("constant")
                .long("constant")
                .requires("class")
                .help("Constant name for --class"),
        )
        .arg(Arg::new("code").long("code").help("Insert a PHP expression as written"))
        .group(ArgGroup::new("value").args(VALUE_FLAGS).required(true).multiple(false))
}

/// Job for a `property` or `return` subcommand
///
/// # Errors
/// Fails for an unknown subcommand, a malformed path or value
pub fn job_from_args(subcommand: &str, args: &ArgMatches) -> Result<Job> {
    let file = args
        .get_one::<PathBuf>("file")
        .cloned()
        .context("missing file argument")?;
    let path: ArrayPath = args
        .get_one::<String>("path")
        .map_or(Ok(ArrayPath::root()), |p| p.parse())
        .context("invalid --path")?;
    let value = value_from_args(args)?;

    match subcommand {
        "property" => {
            let property = args.get_one::<String>("property").context("missing property argument")?;
            Ok(Job::property(file, property.trim_start_matches('$'), path, value))
        }
        "return" => {
            let method = args.get_one::<String>("method").context("missing method argument")?;
            let mut query = MethodQuery::new(method);
            if let Some(visibility) = args.get_one::<String>("visibility") {
                query = query.visibility(visibility.parse::<Visibility>()?);
            }
            if let Some(is_static) = args.get_one::<bool>("static") {
                query = query.is_static(*is_static);
            }
            if let Some(parameters) = args.get_many::<String>("parameters") {
                query = query.parameters(parameters.map(|p| p.trim_start_matches('$')));
            }
            Ok(Job::method_return(file, query, path, value))
        }
        other => bail!("no job for subcommand '{other}'"),
    }
}

/// Value selected by the value flags
///
/// # Errors
/// Fails if no value flag is set, or the value has no literal form
pub fn value_from_args(args: &ArgMatches) -> Result<Value> {
    let value = if args.get_flag("null") {
        Value::Null
    } else if let Some(b) = args.get_one::<bool>("bool") {
        Value::Bool(*b)
    } else if let Some(i) = args.get_one::<i64>("int") {
        Value::Int(*i)
    } else if let Some(x) = args.get_one::<f64>("float") {
        Value::Float(*x)
    } else if let Some(s) = args.get_one::<String>("string") {
        Value::String(s.clone())
    } else if let Some(class) = args.get_one::<String>("class") {
        match args.get_one::<String>("constant") {
            Some(constant) => Value::class_constant(class, constant),
            None => Value::ClassRef(class.clone()),
        }
    } else if let Some(code) = args.get_one::<String>("code") {
        Value::Opaque(parse_fragment(code).context("invalid --code")?)
    } else {
        bail!("no value given");
    };
    value.validate()?;
    Ok(value)
}
