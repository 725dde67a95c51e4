mod annotations;
mod classify;
mod is_a;
mod schema;

use clap::{Parser, Subcommand};
use schemascope_runtime::RuntimeConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "schemascope",
    version,
    about = "Inspect Java types the way an OpenAPI scanner sees them",
    long_about = "Schemascope maps Java types to OpenAPI schema type/format pairs, answers subtype \
                  questions against a class index with a classpath fallback, and reads annotations \
                  recorded in the index."
)]
pub struct Cli {
    /// Also print log lines to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Directory for log files (default: $SCHEMASCOPE_LOG_DIR or ~/.schemascope/logs)
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the OpenAPI type and format of a Java type
    #[command(
        long_about = "Classifies a Java type such as `int`, `java.util.Date` or `java.lang.String[]`. \
                      Types without a known mapping are reported as `object`."
    )]
    Classify {
        #[arg(value_name = "TYPE")]
        ty: String,
    },
    /// List the built-in type to format mappings
    Formats,
    /// Test whether SUBJECT is a subtype of TARGET
    #[command(
        long_about = "Walks the class index first and falls back to the classpath once the \
                      hierarchy leaves the index. The classpath is taken from --classpath and \
                      SCHEMASCOPE_CLASSPATH, followed by the JDK class library."
    )]
    IsA {
        #[command(flatten)]
        runtime: RuntimeArgs,
        #[arg(long, value_name = "INDEX_FILE")]
        index: PathBuf,
        #[arg(value_name = "SUBJECT")]
        subject: String,
        #[arg(value_name = "TARGET")]
        target: String,
    },
    /// Print the annotations on a class, field, method or method parameter
    Annotations {
        #[arg(long, value_name = "INDEX_FILE")]
        index: PathBuf,
        #[arg(value_name = "CLASS")]
        class: String,
        #[arg(long, conflicts_with = "method")]
        field: Option<String>,
        #[arg(long)]
        method: Option<String>,
        /// Zero-based parameter position of --method
        #[arg(long, requires = "method")]
        param: Option<u16>,
        /// Print the type-use annotations of the field, return or parameter type instead
        #[arg(long)]
        type_use: bool,
    },
    /// Print the JSON schema of the index file format
    IndexSchema,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RuntimeArgs {
    /// Class directory or jar, searched before SCHEMASCOPE_CLASSPATH entries
    #[arg(long = "classpath", value_name = "PATH")]
    pub classpath: Vec<PathBuf>,
    /// Do not search the JDK class library
    #[arg(long)]
    pub no_jdk: bool,
}

impl RuntimeArgs {
    /// Puts `--classpath` entries ahead of those already in `config`.
    pub fn to_config(&self, mut config: RuntimeConfig) -> RuntimeConfig {
        let mut classpath = self.classpath.clone();
        classpath.append(&mut config.classpath);
        config.classpath = classpath;
        if self.no_jdk {
            config.include_jdk = false;
        }
        config
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = RuntimeConfig::from_env();
    if let Some(dir) = &cli.log_dir {
        config = config.with_log_dir(dir);
    }
    let _guard = schemascope_runtime::init_logging("cli", &config, cli.verbose);

    match cli.command {
        Commands::Classify { ty } => classify::run(&ty),
        Commands::Formats => classify::list(),
        Commands::IsA {
            runtime,
            index,
            subject,
            target,
        } => is_a::run(&runtime.to_config(config), &index, &subject, &target),
        Commands::Annotations {
            index,
            class,
            field,
            method,
            param,
            type_use,
        } => annotations::run(
            &index,
            &class,
            field.as_deref(),
            method.as_deref(),
            param,
            type_use,
        ),
        Commands::IndexSchema => schema::run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_is_a() {
        let cli = Cli::try_parse_from([
            "schemascope",
            "is-a",
            "--index",
            "index.json",
            "--classpath",
            "a.jar",
            "--classpath",
            "classes",
            "--no-jdk",
            "app.Pet",
            "java.io.Serializable",
        ])
        .unwrap();
        match cli.command {
            Commands::IsA {
                runtime, subject, ..
            } => {
                assert_eq!(runtime.classpath.len(), 2);
                assert!(runtime.no_jdk);
                assert_eq!(subject, "app.Pet");
            }
            _ => panic!("expected is-a"),
        }
    }

    #[test]
    fn test_runtime_args_extend_config() {
        let args = RuntimeArgs {
            classpath: vec![PathBuf::from("first.jar")],
            no_jdk: true,
        };
        let base = RuntimeConfig::default()
            .with_classpath("env.jar")
            .with_log_dir("/tmp/logs");
        let config = args.to_config(base);
        assert_eq!(
            config.classpath,
            vec![PathBuf::from("first.jar"), PathBuf::from("env.jar")]
        );
        assert!(!config.include_jdk);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/logs"));
    }

    #[test]
    fn test_param_requires_method() {
        assert!(
            Cli::try_parse_from([
                "schemascope",
                "annotations",
                "--index",
                "i.json",
                "app.Pet",
                "--param",
                "0"
            ])
            .is_err()
        );
    }
}
