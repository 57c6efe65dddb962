use ift_segmenter::image::io;
use ift_segmenter::{
    generate_automatic_seeds, ArcWeight, ExecutionStats, Extension, GrayImage, IftSolver,
    PathCost, SeedSet,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "ift_processor".to_string());
    let config = parse_args(&program)?;

    let image = io::load_grayscale(&config.input_path)?;
    println!(
        "Loaded {} ({}x{})",
        config.input_path.display(),
        image.width(),
        image.height()
    );

    let seeds = build_seeds(&image, &config);
    println!("Seeds: {} active", seeds.active_count());

    let cost = PathCost::new(config.extension, config.weight);
    println!(
        "Cost function: {} ({} solver)",
        cost.name(),
        if config.optimized { "optimized" } else { "basic" }
    );

    let mut solver = IftSolver::default();
    let result = if config.optimized {
        solver.run_optimized(&image, &cost, &seeds)
    } else {
        solver.run_basic(&image, &cost, &seeds)
    };

    let stats = *solver.last_stats();
    println!(
        "Processed {} pixels in {:.1} ms (complete: {}, valid forest: {})",
        stats.pixels_processed, stats.execution_ms, stats.is_complete, stats.is_valid
    );

    print_label_distribution(&image, &result);

    io::save_label_visualization(&image, &result, &config.output_path)?;
    println!("Result saved to {}", config.output_path.display());

    if let Some(path) = &config.json_out {
        let report = RunReport {
            image: config.input_path.display().to_string(),
            width: image.width(),
            height: image.height(),
            seed_count: seeds.active_count(),
            cost_function: cost.name(),
            solver: if config.optimized { "optimized" } else { "basic" },
            stats,
        };
        io::write_json_file(path, &report)?;
        println!("JSON report written to {}", path.display());
    }

    if config.show {
        println!("Display windows are not available in this build (--show ignored).");
    }

    Ok(())
}

/// Per-run summary emitted by `--json-out`.
#[derive(Serialize)]
struct RunReport {
    image: String,
    width: usize,
    height: usize,
    seed_count: usize,
    cost_function: String,
    solver: &'static str,
    stats: ExecutionStats,
}

struct CliConfig {
    input_path: PathBuf,
    interactive: bool,
    seed_count: usize,
    extension: Extension,
    weight: ArcWeight,
    output_path: PathBuf,
    json_out: Option<PathBuf>,
    show: bool,
    optimized: bool,
}

fn parse_args(program: &str) -> Result<CliConfig, String> {
    let mut args = env::args().skip(1);
    let mut input_path: Option<PathBuf> = None;
    let mut interactive = false;
    let mut seed_count = 4usize;
    let mut extension = Extension::Sum;
    let mut weight = ArcWeight::IntensityDiff;
    let mut output_path = PathBuf::from("resultado_ift.png");
    let mut json_out: Option<PathBuf> = None;
    let mut show = false;
    let mut optimized = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                println!("{}", usage(program));
                std::process::exit(0);
            }
            "-i" | "--interactive" => {
                interactive = true;
            }
            "-a" | "--automatic" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("-a expects a seed count\n{}", usage(program)))?;
                let parsed: i64 = value
                    .parse()
                    .map_err(|_| format!("Invalid seed count '{value}'"))?;
                if parsed < 1 {
                    return Err(format!("Seed count must be at least 1, got {parsed}"));
                }
                seed_count = parsed as usize;
                interactive = false;
            }
            "-f" | "--function" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("-f expects sum|max\n{}", usage(program)))?;
                extension = match value.as_str() {
                    "sum" => Extension::Sum,
                    "max" => Extension::Max,
                    other => return Err(format!("Unknown cost function '{other}'. Use sum|max.")),
                };
            }
            "-w" | "--weight" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("-w expects diff|grad|const\n{}", usage(program)))?;
                weight = match value.as_str() {
                    "diff" => ArcWeight::IntensityDiff,
                    "grad" => ArcWeight::Gradient { sigma: 1.0 },
                    "const" => ArcWeight::Constant { weight: 1.0 },
                    other => {
                        return Err(format!(
                            "Unknown weight strategy '{other}'. Use diff|grad|const."
                        ))
                    }
                };
            }
            "-o" | "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("-o expects a path\n{}", usage(program)))?;
                output_path = PathBuf::from(value);
            }
            "--json-out" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("--json-out expects a path\n{}", usage(program)))?;
                json_out = Some(PathBuf::from(value));
            }
            "-s" | "--show" => {
                show = true;
            }
            "-opt" | "--optimized" => {
                optimized = true;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("Unknown option '{arg}'\n{}", usage(program)));
            }
            _ => {
                if input_path.is_some() {
                    return Err(format!(
                        "Unexpected positional argument '{arg}'\n{}",
                        usage(program)
                    ));
                }
                input_path = Some(PathBuf::from(arg));
            }
        }
    }

    let input_path = input_path.ok_or_else(|| usage(program))?;
    Ok(CliConfig {
        input_path,
        interactive,
        seed_count,
        extension,
        weight,
        output_path,
        json_out,
        show,
        optimized,
    })
}

fn build_seeds(image: &GrayImage, config: &CliConfig) -> SeedSet {
    if config.interactive {
        println!("Interactive seed selection is not available in this build;");
        println!("falling back to {} automatic seeds.", config.seed_count);
    }
    generate_automatic_seeds(image, config.seed_count)
}

fn print_label_distribution(image: &GrayImage, result: &ift_segmenter::IftResult) {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for p in image.all_pixels() {
        *counts.entry(result.label(p)).or_default() += 1;
    }
    let total = image.len() as f64;
    println!("Label distribution:");
    for (label, count) in counts {
        println!(
            "  label {label}: {count} pixels ({:.1}%)",
            100.0 * count as f64 / total
        );
    }
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <image-path> [options]\n\n\
Options:\n  \
-i, --interactive    Interactive seed selection (headless: falls back to -a)\n  \
-a, --automatic N    Generate N automatic seeds (default: 4)\n  \
-f, --function FUNC  Cost function: sum, max (default: sum)\n  \
-w, --weight WEIGHT  Arc weight: diff, grad, const (default: diff)\n  \
-o, --output FILE    Output image (default: resultado_ift.png)\n  \
--json-out FILE      Write run statistics as a JSON report\n  \
-s, --show           Display result windows (no-op in headless builds)\n  \
-opt, --optimized    Use the bucket-optimized solver\n\n\
Examples:\n  {program} photo.png -a 6 -f max -w grad -o segmented.png\n  {program} photo.png -opt --json-out report.json\n"
    )
}
