// Nexa Companion - Build Task Runner
// Unified build system using cargo xtask pattern

use anyhow::{Context, Result};
use xshell::{Shell, cmd};

fn main() -> Result<()> {
    let sh = Shell::new()?;
    let args: Vec<_> = std::env::args().skip(1).collect();

    match args.first().map(|s| s.as_str()) {
        Some("build") => {
            let release = args.contains(&"--release".to_string());
            build(&sh, release)
        }
        Some("test") => test(&sh),
        Some("format") => {
            let check = args.contains(&"--check".to_string());
            format(&sh, check)
        }
        Some("clippy") => clippy(&sh),
        Some("run") => run(&sh, &args[1..]),
        Some("clean") => clean(&sh),
        Some("coverage") => coverage(&sh),
        Some("ci") => ci(&sh),
        Some("dist") => dist(&sh),
        Some("install") => {
            if args.len() < 2 {
                eprintln!("Error: install requires a destination path");
                eprintln!("Usage: cargo xtask install <destination>");
                std::process::exit(1);
            }
            install(&sh, &args[1])
        }
        _ => {
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("Nexa Companion - Build Commands:");
    println!();
    println!("Usage: cargo xtask <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  build [--release]   Build the backend");
    println!("  test                Run all tests");
    println!("  format [--check]    Format code (check mode doesn't modify)");
    println!("  clippy              Run clippy checks");
    println!("  run [ARGS...]       Build and run the application");
    println!("  clean               Clean build artifacts");
    println!("  coverage            Generate test coverage report");
    println!("  ci                  Run all CI checks (format + clippy + build + test)");
    println!("  dist                Create distribution package (tar.gz)");
    println!("  install <path>      Build and install to specified path");
    println!();
    println!("Examples:");
    println!("  cargo xtask build");
    println!("  cargo xtask build --release");
    println!("  cargo xtask test");
    println!("  cargo xtask format --check");
}

/// Build the backend
fn build(sh: &Shell, release: bool) -> Result<()> {
    println!("🔨 Building Nexa Companion...");
    println!();

    if release {
        println!("🔍 [1/2] Running clippy checks...");
        clippy(sh)?;
        println!("✅ Clippy checks passed");
        println!();
    }

    println!(
        "🦀 [{}/2] Building backend{}...",
        if release { 2 } else { 1 },
        if release { " (release)" } else { "" }
    );
    build_backend(sh, release)?;
    println!("✅ Backend build complete");
    println!();

    println!("🎉 Build complete!");

    if release {
        println!();
        println!("📦 Distribution package location:");
        println!("   build/dist/");
    }

    Ok(())
}

/// Build backend using cargo
fn build_backend(sh: &Shell, release: bool) -> Result<()> {
    let _dir = sh.push_dir(project_root().join("backend"));

    if release {
        cmd!(sh, "cargo build --release")
            .run()
            .context("Failed to build backend in release mode")?;

        // Create distribution structure
        create_distribution(sh)?;
    } else {
        cmd!(sh, "cargo build")
            .run()
            .context("Failed to build backend")?;
    }

    Ok(())
}

/// Create distribution package structure
fn create_distribution(sh: &Shell) -> Result<()> {
    let project = project_root();
    let dist_dir = project.join("build/dist");

    // Create directories
    cmd!(sh, "mkdir -p {dist_dir}/bin").run()?;
    cmd!(sh, "mkdir -p {dist_dir}/conf").run()?;
    cmd!(sh, "mkdir -p {dist_dir}/logs").run()?;

    // Copy binary
    let binary_src = project.join("backend/target/release/nexa-companion");
    let binary_dst = dist_dir.join("bin/nexa-companion");
    cmd!(sh, "cp {binary_src} {binary_dst}").run()?;

    // Create config file
    create_config_file(sh, &dist_dir)?;

    Ok(())
}

/// Create default config file
fn create_config_file(_sh: &Shell, dist_dir: &std::path::Path) -> Result<()> {
    let config_path = dist_dir.join("conf/config.toml");
    let config_content = r#"[server]
host = "0.0.0.0"
port = 8080

[inference]
api_base = "https://openrouter.ai/api/v1"
model = "google/gemini-2.0-flash-exp:free"
temperature = 0.7
max_tokens = 512
timeout_secs = "10s"

[cors]
allowed_origins = [
    "http://localhost:63342",
    "https://nexahealth.vercel.app",
]

[logging]
level = "info,nexa_companion=debug"
file = "logs/nexa-companion.log"
"#;

    std::fs::write(config_path, config_content).context("Failed to create config file")?;

    Ok(())
}

/// Run all tests
fn test(sh: &Shell) -> Result<()> {
    println!("🧪 Running tests...");
    println!();

    let _dir = sh.push_dir(project_root().join("backend"));

    cmd!(sh, "cargo test --workspace")
        .run()
        .context("Tests failed")?;

    println!();
    println!("✅ All tests passed!");

    Ok(())
}

/// Format code
fn format(sh: &Shell, check: bool) -> Result<()> {
    println!("🎨 Formatting code...");
    println!();

    println!("📝 Formatting Rust code...");
    let _dir = sh.push_dir(project_root().join("backend"));

    if check {
        cmd!(sh, "cargo fmt --all -- --check")
            .run()
            .context("Rust code is not formatted")?;
        println!("✅ Rust code is properly formatted");
    } else {
        cmd!(sh, "cargo fmt --all")
            .run()
            .context("Failed to format Rust code")?;
        println!("✅ Rust code formatted");
    }

    Ok(())
}

/// Run clippy checks
fn clippy(sh: &Shell) -> Result<()> {
    let _dir = sh.push_dir(project_root().join("backend"));

    cmd!(sh, "cargo clippy --release --all-targets -- --deny warnings --allow clippy::uninlined-format-args")
        .run()
        .context("Clippy checks failed")?;

    Ok(())
}

/// Build and run the application
fn run(sh: &Shell, args: &[String]) -> Result<()> {
    println!("🚀 Building and running Nexa Companion...");
    println!();

    // Build in debug mode
    build(sh, false)?;

    println!();
    println!("▶️  Starting application...");
    println!();

    let _dir = sh.push_dir(project_root().join("backend"));

    let mut cmd = cmd!(sh, "cargo run --");
    for arg in args {
        cmd = cmd.arg(arg);
    }

    cmd.run().context("Failed to run application")?;

    Ok(())
}

/// Clean build artifacts
fn clean(sh: &Shell) -> Result<()> {
    println!("🧹 Cleaning build artifacts...");
    println!();

    let project = project_root();

    println!("🗑️  Cleaning backend...");
    let _dir = sh.push_dir(project.join("backend"));
    cmd!(sh, "cargo clean").run()?;

    println!("🗑️  Cleaning build directory...");
    let build_dir = project.join("build");
    if build_dir.exists() {
        cmd!(sh, "rm -rf {build_dir}").run()?;
    }

    println!();
    println!("✅ Clean complete!");

    Ok(())
}

/// Run all CI checks (format + clippy + build + test)
fn ci(sh: &Shell) -> Result<()> {
    println!("🔄 Running CI pipeline...");
    println!();

    // Step 1: Format check
    println!("📝 [1/4] Checking code format...");
    format(sh, true)?;
    println!("✅ Format check passed");
    println!();

    // Step 2: Clippy
    println!("🔍 [2/4] Running clippy checks...");
    clippy(sh)?;
    println!("✅ Clippy checks passed");
    println!();

    // Step 3: Build
    println!("🔨 [3/4] Building project...");
    build(sh, true)?;
    println!("✅ Build successful");
    println!();

    // Step 4: Test
    println!("🧪 [4/4] Running tests...");
    test(sh)?;
    println!("✅ All tests passed");
    println!();

    println!("🎉 CI pipeline completed successfully!");

    Ok(())
}

/// Create distribution package (tar.gz)
fn dist(sh: &Shell) -> Result<()> {
    println!("📦 Creating distribution package...");
    println!();

    // Build in release mode
    println!("🔨 Building release version...");
    build(sh, true)?;
    println!();

    let project = project_root();
    let dist_dir = project.join("build/dist");

    // Generate timestamp-based package name
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let package_name = format!("nexa-companion-{}.tar.gz", timestamp);
    let package_path = dist_dir.join(&package_name);

    println!("📋 Creating tarball: {}...", package_name);

    // Create tar.gz
    let _dir = sh.push_dir(&dist_dir);
    cmd!(sh, "tar czf {package_name} bin conf logs")
        .run()
        .context("Failed to create tarball")?;

    println!();
    println!("✅ Distribution package created!");
    println!("   Location: {}", package_path.display());
    println!(
        "   Size: {} MB",
        std::fs::metadata(&package_path)?.len() / 1024 / 1024
    );
    println!();
    println!("📝 To extract:");
    println!("   tar xzf {}", package_name);

    Ok(())
}

/// Install built binary to specified path
fn install(sh: &Shell, destination: &str) -> Result<()> {
    println!("📦 Installing Nexa Companion to {}...", destination);
    println!();

    // Build in release mode
    println!("🔨 Building release version...");
    build(sh, true)?;
    println!();

    let project = project_root();
    let binary_src = project.join("backend/target/release/nexa-companion");
    let dest_path = std::path::Path::new(destination);

    // Create destination directory if it doesn't exist
    if let Some(parent) = dest_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create destination directory")?;
    }

    // Copy binary
    println!("📋 Copying binary to {}...", destination);
    std::fs::copy(&binary_src, dest_path).context("Failed to copy binary")?;

    // Make executable (Unix only)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(dest_path)?.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(dest_path, perms)?;
    }

    println!();
    println!("✅ Installation complete!");
    println!("   Binary: {}", destination);

    Ok(())
}

/// Generate test coverage report
fn coverage(sh: &Shell) -> Result<()> {
    println!("📊 Generating test coverage report...");
    println!();

    let _dir = sh.push_dir(project_root().join("backend"));

    // Check if cargo-tarpaulin is installed
    let tarpaulin_check = cmd!(sh, "cargo tarpaulin --version").ignore_status().run();

    if tarpaulin_check.is_err() {
        println!("⚠️  cargo-tarpaulin not found. Installing...");
        cmd!(sh, "cargo install cargo-tarpaulin")
            .run()
            .context("Failed to install cargo-tarpaulin")?;
    }

    // Generate coverage
    cmd!(
        sh,
        "cargo tarpaulin --workspace --out Html --out Xml --output-dir ../build/coverage"
    )
    .run()
    .context("Failed to generate coverage report")?;

    println!();
    println!("✅ Coverage report generated!");
    println!("   HTML: build/coverage/index.html");
    println!("   XML:  build/coverage/cobertura.xml");

    Ok(())
}

/// Get project root directory
fn project_root() -> std::path::PathBuf {
    std::path::Path::new(&env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .unwrap()
        .to_path_buf()
}
