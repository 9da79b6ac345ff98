//! receipt-verify CLI
//!
//! Entry point for the `receipt-verify` command-line tool.

use clap::{ArgAction, Parser, Subcommand};
use receipt_verify::config::EffectiveConfig;
use receipt_verify::hash::{parse_salt_hex, SaltMode};
use receipt_verify::signature::{
    generate_keypair, kid_for, sign_receipt, signing_key_from_seed_hex, SignatureEncoding,
    SignatureOverrides,
};
use receipt_verify::{
    canonical_digest, canonical_string, ArtifactInputs, ExitCode, Receipt, SignaturePolicy,
    Verifier, VerifierSettings,
};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::Level;

#[derive(Parser)]
#[command(name = "receipt-verify")]
#[command(about = "Offline verification of signed model receipts", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); logs go to stderr
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every check and print the verdict as JSON
    Verify {
        /// Path to the receipt JSON
        receipt: PathBuf,

        /// Artifact the receipt's input_hash refers to
        #[arg(long)]
        input: Option<PathBuf>,

        /// Artifact the receipt's output_hash refers to
        #[arg(long)]
        output: Option<PathBuf>,

        /// Hex salt mixed into artifact hashes
        #[arg(long)]
        salt: Option<String>,

        /// Salt placement (prefix, suffix)
        #[arg(long)]
        salt_mode: Option<SaltMode>,

        /// JSON Schema document (default: bundled receipt schema)
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Config file (default: ./receipt-verify.toml when present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Public key (hex or base64), overrides the receipt
        #[arg(long)]
        public_key: Option<String>,

        /// Signature (hex or base64), overrides the receipt
        #[arg(long)]
        signature: Option<String>,

        /// Signature algorithm, overrides the receipt
        #[arg(long)]
        algorithm: Option<String>,

        /// Whether the signature gates the verdict (informational, gating)
        #[arg(long)]
        signature_policy: Option<SignaturePolicy>,

        /// Run without a signing primitive (signature reports not_implemented)
        #[arg(long)]
        no_signature: bool,
    },

    /// Run only the schema check
    Schema {
        /// Path to the receipt JSON
        receipt: PathBuf,

        /// JSON Schema document (default: bundled receipt schema)
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Config file (default: ./receipt-verify.toml when present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Print the effective configuration and the sources it was merged from
    Config {
        /// Config file (default: ./receipt-verify.toml when present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Print the canonical signing message and its SHA-256
    Canon {
        /// Path to the receipt JSON
        receipt: PathBuf,
    },

    /// Sign a receipt with an Ed25519 seed
    Sign {
        /// Path to the receipt JSON
        receipt: PathBuf,

        /// 32-byte Ed25519 seed as hex
        #[arg(long)]
        seed: String,

        /// Write the signed receipt here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Signature encoding (base64, hex)
        #[arg(long, default_value = "base64")]
        encoding: SignatureEncoding,
    },

    /// Generate a fresh Ed25519 key
    Keygen,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help/--version print to stdout and succeed; usage errors map to 1
            let _ = e.print();
            let code = if e.use_stderr() {
                ExitCode::Usage
            } else {
                ExitCode::Pass
            };
            process::exit(code.as_i32());
        }
    };

    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Verify {
            receipt,
            input,
            output,
            salt,
            salt_mode,
            schema,
            config,
            public_key,
            signature,
            algorithm,
            signature_policy,
            no_signature,
        } => {
            let overrides = ConfigOverrides {
                salt_mode,
                schema,
                signature_policy,
                no_signature,
            };
            let signature_overrides = SignatureOverrides {
                public_key: public_key.as_deref(),
                signature: signature.as_deref(),
                algorithm: algorithm.as_deref(),
            };
            run_verify(
                &receipt,
                input.as_deref(),
                output.as_deref(),
                salt.as_deref(),
                config.as_deref(),
                overrides,
                &signature_overrides,
            )
        }
        Commands::Schema {
            receipt,
            schema,
            config,
        } => {
            let overrides = ConfigOverrides {
                schema,
                ..ConfigOverrides::default()
            };
            run_schema(&receipt, config.as_deref(), overrides)
        }
        Commands::Config { config } => run_config(config.as_deref()),
        Commands::Canon { receipt } => run_canon(&receipt),
        Commands::Sign {
            receipt,
            seed,
            out,
            encoding,
        } => run_sign(&receipt, &seed, out.as_deref(), encoding),
        Commands::Keygen => run_keygen(),
    };

    match result {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(ExitCode::Usage.as_i32());
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Flags that feed the CLI configuration layer
#[derive(Default)]
struct ConfigOverrides {
    salt_mode: Option<SaltMode>,
    schema: Option<PathBuf>,
    signature_policy: Option<SignaturePolicy>,
    no_signature: bool,
}

impl ConfigOverrides {
    fn to_value(&self) -> Option<Value> {
        let mut layer = Map::new();
        if let Some(mode) = self.salt_mode {
            layer.insert("hashes".to_string(), json!({ "salt_mode": mode }));
        }
        if let Some(path) = &self.schema {
            layer.insert("schema".to_string(), json!({ "path": path }));
        }
        if let Some(policy) = self.signature_policy {
            layer.insert("verdict".to_string(), json!({ "signature_policy": policy }));
        }
        if self.no_signature {
            layer.insert("signature".to_string(), json!({ "enabled": false }));
        }
        (!layer.is_empty()).then_some(Value::Object(layer))
    }
}

fn load_config(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<EffectiveConfig, String> {
    let config_file = EffectiveConfig::discover(config_path);
    EffectiveConfig::build(config_file.as_deref(), overrides.to_value())
        .map_err(|e| format!("loading config: {}", e))
}

fn load_settings(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<VerifierSettings, String> {
    Ok(load_config(config_path, overrides)?.settings().clone())
}

fn load_receipt(path: &Path) -> Result<Receipt, String> {
    Receipt::from_file(path).map_err(|e| format!("reading receipt {}: {}", path.display(), e))
}

fn read_artifact(path: Option<&Path>) -> Result<Option<Vec<u8>>, String> {
    path.map(|p| fs::read(p).map_err(|e| format!("reading artifact {}: {}", p.display(), e)))
        .transpose()
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("serializing output: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn run_verify(
    receipt_path: &Path,
    input: Option<&Path>,
    output: Option<&Path>,
    salt: Option<&str>,
    config_path: Option<&Path>,
    overrides: ConfigOverrides,
    signature_overrides: &SignatureOverrides<'_>,
) -> Result<ExitCode, String> {
    let settings = load_settings(config_path, &overrides)?;
    let receipt = load_receipt(receipt_path)?;

    let input = read_artifact(input)?;
    let output = read_artifact(output)?;
    let salt = salt
        .map(parse_salt_hex)
        .transpose()
        .map_err(|e| e.to_string())?;

    let mut inputs = ArtifactInputs::new();
    if let Some(bytes) = &input {
        inputs = inputs.input(bytes);
    }
    if let Some(bytes) = &output {
        inputs = inputs.output(bytes);
    }
    if let Some(bytes) = &salt {
        inputs = inputs.salt(bytes, settings.hashes.salt_mode);
    }

    let verifier = Verifier::from_settings(&settings).map_err(|e| e.to_string())?;
    let verdict = verifier.verify_receipt(&receipt, &inputs, signature_overrides);

    print_json(&verdict)?;
    Ok(ExitCode::from(verdict.verdict))
}

fn run_schema(
    receipt_path: &Path,
    config_path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<ExitCode, String> {
    let settings = load_settings(config_path, &overrides)?;
    let receipt = load_receipt(receipt_path)?;

    let verifier = Verifier::from_settings(&settings).map_err(|e| e.to_string())?;
    let check = verifier.check_schema_only(&receipt);

    print_json(&check)?;
    Ok(ExitCode::from(&check))
}

fn run_config(config_path: Option<&Path>) -> Result<ExitCode, String> {
    let config = load_config(config_path, &ConfigOverrides::default())?;
    print_json(&config)?;
    Ok(ExitCode::Pass)
}

fn run_canon(receipt_path: &Path) -> Result<ExitCode, String> {
    let receipt = load_receipt(receipt_path)?;
    println!("{}", canonical_string(&receipt));
    println!("sha256: {}", canonical_digest(&receipt));
    Ok(ExitCode::Pass)
}

fn run_sign(
    receipt_path: &Path,
    seed: &str,
    out: Option<&Path>,
    encoding: SignatureEncoding,
) -> Result<ExitCode, String> {
    let receipt = load_receipt(receipt_path)?;
    let key = signing_key_from_seed_hex(seed).map_err(|e| e.to_string())?;
    let signed = sign_receipt(&receipt, &key, encoding).map_err(|e| e.to_string())?;
    let json = signed
        .to_json()
        .map_err(|e| format!("serializing receipt: {}", e))?;

    match out {
        Some(path) => {
            fs::write(path, format!("{}\n", json))
                .map_err(|e| format!("writing {}: {}", path.display(), e))?;
            tracing::info!(path = %path.display(), "signed receipt written");
        }
        None => println!("{}", json),
    }
    Ok(ExitCode::Pass)
}

fn run_keygen() -> Result<ExitCode, String> {
    let key = generate_keypair();
    let verifying_key = key.verifying_key();
    print_json(&json!({
        "seed": hex::encode(key.to_bytes()),
        "public_key": hex::encode(verifying_key.as_bytes()),
        "kid": kid_for(&verifying_key),
    }))?;
    Ok(ExitCode::Pass)
}
