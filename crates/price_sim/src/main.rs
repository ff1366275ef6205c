use std::env;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::num::ParseIntError;
use std::path::PathBuf;

use pricing::{
    load_catalog, quote, CalculationFormula, Cents, GameId, ModifierCatalog, PriceRange,
    PricingPolicy, QuoteRequest, ServiceTypeId,
};

const CATALOG_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../assets/catalogs/wow_leveling.toml"
);

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), String> {
    let args = Args::parse()?;
    let path = args.catalog.as_deref().unwrap_or(CATALOG_PATH);
    let catalog = load_catalog(path).map_err(|err| err.to_string())?;
    run_sweep(&args, &catalog).map_err(|err| err.to_string())
}

fn run_sweep(args: &Args, catalog: &ModifierCatalog) -> Result<(), std::io::Error> {
    if let Some(parent) = args.out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(&args.out)?;
    let mut writer = BufWriter::new(file);
    writeln!(
        writer,
        "formula,from_level,to_level,base_cents,final_cents,modifiers,execution_ms"
    )?;

    let policy = PricingPolicy::default();
    let span = level_span(&args.levels);
    for window in args.levels.windows(2) {
        let (from, to) = (window[0], window[1]);
        for (name, formula) in formula_set(span) {
            let request = QuoteRequest {
                formula: Some(formula),
                base_price: Cents(args.base_price),
                from_level: from,
                to_level: to,
                game: GameId(args.game),
                service_type: ServiceTypeId(args.service_type),
                modifier_codes: Vec::new(),
            };
            match quote(&request, catalog, &policy) {
                Ok(result) => writeln!(
                    writer,
                    "{name},{from},{to},{},{},{},{}",
                    result.base_price.as_i64(),
                    result.final_price.as_i64(),
                    result.applied_modifiers.len(),
                    result.execution_time.as_millis()
                )?,
                Err(err) => eprintln!("{name} {from}->{to}: {err}"),
            }
        }
    }

    writer.flush()
}

fn formula_set((lo, hi): (i32, i32)) -> Vec<(&'static str, CalculationFormula)> {
    let mut set = vec![
        (
            "linear",
            CalculationFormula::Linear {
                price_per_level: Cents(200),
            },
        ),
        (
            "time_based",
            CalculationFormula::TimeBased {
                hours_per_level: 0.5,
                rate_per_hour: Cents(1_200),
            },
        ),
        (
            "expression",
            CalculationFormula::Expression {
                formula_text: "base_price + level_difference * per_level".to_string(),
                variables: [("per_level".to_string(), 250i64)].into_iter().collect(),
            },
        ),
    ];

    if hi > lo {
        let mid = lo + (hi - lo) / 2;
        let segments = if mid > lo && mid < hi {
            vec![
                PriceRange {
                    from_level: lo,
                    to_level: mid,
                    price_per_level: Cents(150),
                },
                PriceRange {
                    from_level: mid,
                    to_level: hi,
                    price_per_level: Cents(300),
                },
            ]
        } else {
            vec![PriceRange {
                from_level: lo,
                to_level: hi,
                price_per_level: Cents(150),
            }]
        };
        set.push(("range", CalculationFormula::Range { segments }));
    }

    set
}

fn level_span(levels: &[i32]) -> (i32, i32) {
    let lo = levels.iter().copied().min().unwrap_or(1);
    let hi = levels.iter().copied().max().unwrap_or(1);
    (lo, hi)
}

struct Args {
    catalog: Option<String>,
    game: u32,
    service_type: u32,
    base_price: i64,
    levels: Vec<i32>,
    out: PathBuf,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut catalog = None;
        let mut game = 1u32;
        let mut service_type = 1u32;
        let mut base_price = 10_000i64;
        let mut levels = vec![1, 10, 20, 30];
        let mut out = PathBuf::from("target/price_curves.csv");
        let mut iter = env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--catalog" => catalog = Some(next_value(&mut iter, "--catalog")?),
                "--game" => game = parse_u32(next_value(&mut iter, "--game")?)?,
                "--service-type" => {
                    service_type = parse_u32(next_value(&mut iter, "--service-type")?)?
                }
                "--base-price" => base_price = parse_i64(next_value(&mut iter, "--base-price")?)?,
                "--levels" => levels = parse_list_i32(next_value(&mut iter, "--levels")?)?,
                "--out" => out = PathBuf::from(next_value(&mut iter, "--out")?),
                flag => return Err(format!("unknown argument {flag}")),
            }
        }

        if levels.len() < 2 {
            return Err("--levels needs at least two checkpoints".to_string());
        }

        Ok(Self {
            catalog,
            game,
            service_type,
            base_price,
            levels,
            out,
        })
    }
}

fn next_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    iter.next().ok_or_else(|| format!("{flag} expects a value"))
}

fn parse_u32(value: String) -> Result<u32, String> {
    value.parse().map_err(|err: ParseIntError| err.to_string())
}

fn parse_i64(value: String) -> Result<i64, String> {
    value.parse().map_err(|err: ParseIntError| err.to_string())
}

fn parse_list_i32(raw: String) -> Result<Vec<i32>, String> {
    raw.split(',')
        .filter(|s| !s.is_empty())
        .map(|part| {
            part.replace('_', "")
                .parse::<i32>()
                .map_err(|err| err.to_string())
        })
        .collect()
}
