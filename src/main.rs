mod apriori;
mod command_line_args;
mod dataset;
mod encoder;
mod errors;
mod incidence;
mod item;
mod itemizer;
mod prep;
mod recommend;
mod rules;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::process;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::apriori::mine_frequent_itemsets;
use crate::command_line_args::{parse_args_or_exit, Arguments};
use crate::dataset::read_retail_csv;
use crate::encoder::{encode, BasketRecord};
use crate::item::Item;
use crate::itemizer::Itemizer;
use crate::prep::{description_of, filter_country, prepare};
use crate::recommend::recommend;
use crate::rules::{generate_rules, Rule};

fn mine_rules(args: &Arguments) -> Result<()> {
    let start = Instant::now();

    info!("mining data set: {}", args.input_file_path);
    let records = read_retail_csv(&args.input_file_path)
        .with_context(|| format!("failed to read {}", args.input_file_path))?;
    let records = prepare(records);
    let records = filter_country(&records, &args.country);
    info!(
        country = %args.country,
        records = records.len(),
        "restricted to one country's invoices"
    );

    // Intern product identities and build the basket/item incidence table.
    let timer = Instant::now();
    let mut itemizer = Itemizer::new();
    let basket_records: Vec<BasketRecord> = records
        .iter()
        .map(|r| {
            let name = if args.use_descriptions {
                &r.description
            } else {
                &r.stock_code
            };
            BasketRecord::new(&r.invoice, itemizer.id_of(name), r.quantity)
        })
        .collect();
    let table = encode(&basket_records)?;
    info!(
        baskets = table.basket_count(),
        "encoded incidence table in {:?}",
        timer.elapsed()
    );

    let timer = Instant::now();
    let itemsets = mine_frequent_itemsets(&table, args.min_support)?;
    info!(
        itemsets = itemsets.len(),
        "apriori finished in {:?}",
        timer.elapsed()
    );

    let timer = Instant::now();
    let rules = generate_rules(&itemsets, args.metric, args.min_threshold);
    info!(rules = rules.len(), "scored rules in {:?}", timer.elapsed());

    write_rules(&args.output_rules_path, &rules, &itemizer)
        .with_context(|| format!("failed to write {}", args.output_rules_path))?;

    if let Some(query) = &args.recommend {
        match itemizer.lookup(query) {
            Some(item) => {
                let recommended = recommend(&rules, item, args.rec_metric, args.rec_count)?;
                if recommended.is_empty() {
                    println!("No rules with {} in the antecedent.", query);
                }
                for item in recommended {
                    let code = itemizer.str_of(item);
                    match description_of(&records, code) {
                        Some(description) => println!("{}  {}", code, description),
                        None => println!("{}", code),
                    }
                }
            }
            None => warn!("product {} does not occur in the mined baskets", query),
        }
    }

    info!("total runtime {:?}", start.elapsed());
    Ok(())
}

fn write_rules(path: &str, rules: &[Rule], itemizer: &Itemizer) -> Result<()> {
    let mut output = File::create(path)?;
    writeln!(
        output,
        "Antecedent,Consequent,Support,Confidence,Lift,Leverage,Conviction"
    )?;
    for rule in rules {
        writeln!(
            output,
            "{},{},{},{},{},{},{}",
            Item::item_vec_to_string(&rule.antecedent, itemizer),
            Item::item_vec_to_string(&rule.consequent, itemizer),
            rule.support,
            rule.confidence,
            rule.lift,
            rule.leverage,
            rule.conviction,
        )?;
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let arguments = parse_args_or_exit();
    if let Err(err) = mine_rules(&arguments) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}
