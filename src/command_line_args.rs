use crate::rules::Metric;
use std::env;
use std::io;
use std::process;
use std::str::FromStr;

use argparse::{ArgumentParser, Store, StoreOption, StoreTrue};

pub struct Arguments {
    pub input_file_path: String,
    pub output_rules_path: String,
    pub country: String,
    pub min_support: f64,
    pub metric: Metric,
    pub min_threshold: f64,
    pub recommend: Option<String>,
    pub rec_metric: Metric,
    pub rec_count: usize,
    pub use_descriptions: bool,
}

pub fn parse_args_or_exit() -> Arguments {
    let mut input_file_path = String::new();
    let mut output_rules_path = String::new();
    let mut country = String::from("France");
    let mut min_support: f64 = 0.01;
    let mut metric = String::from("support");
    let mut min_threshold: f64 = 0.01;
    let mut recommend: Option<String> = None;
    let mut rec_metric = String::from("lift");
    let mut rec_count: usize = 3;
    let mut use_descriptions = false;

    {
        let mut parser = ArgumentParser::new();
        parser.set_description(
            "Apriori association rule mining over a retail transaction export, \
             with basket-stage product recommendations.",
        );

        parser
            .refer(&mut input_file_path)
            .add_option(
                &["--input"],
                Store,
                "Input transaction dataset in CSV format.",
            )
            .metavar("file_path")
            .required();

        parser
            .refer(&mut output_rules_path)
            .add_option(
                &["--output"],
                Store,
                "File path in which to store output rules. Format: antecedent, \
                 consequent, support, confidence, lift, leverage, conviction.",
            )
            .metavar("file_path")
            .required();

        parser
            .refer(&mut country)
            .add_option(
                &["--country"],
                Store,
                "Mine the baskets of this country only. Default: France.",
            )
            .metavar("name");

        parser
            .refer(&mut min_support)
            .add_option(
                &["--min-support"],
                Store,
                "Minimum itemset support threshold, in range (0,1]. Default: 0.01.",
            )
            .metavar("threshold");

        parser
            .refer(&mut metric)
            .add_option(
                &["--metric"],
                Store,
                "Metric to threshold rules on: support, confidence or lift. \
                 Default: support.",
            )
            .metavar("name");

        parser
            .refer(&mut min_threshold)
            .add_option(
                &["--min-threshold"],
                Store,
                "Minimum value of --metric for a rule to be kept. Default: 0.01.",
            )
            .metavar("threshold");

        parser
            .refer(&mut recommend)
            .add_option(
                &["--recommend"],
                StoreOption,
                "Print recommendations for customers holding this product.",
            )
            .metavar("stock_code");

        parser
            .refer(&mut rec_metric)
            .add_option(
                &["--rec-metric"],
                Store,
                "Metric to rank recommendations by. Default: lift.",
            )
            .metavar("name");

        parser
            .refer(&mut rec_count)
            .add_option(
                &["--rec-count"],
                Store,
                "Number of products to recommend. Default: 3.",
            )
            .metavar("count");

        parser.refer(&mut use_descriptions).add_option(
            &["--use-descriptions"],
            StoreTrue,
            "Identify products by description rather than stock code.",
        );

        if env::args().count() == 1 {
            parser.print_help("Usage:", &mut io::stderr()).unwrap();
            process::exit(1);
        }

        match parser.parse_args() {
            Ok(()) => {}
            Err(err) => {
                process::exit(err);
            }
        }
    }

    if min_support <= 0.0 || min_support > 1.0 {
        eprintln!("Minimum itemset support must be in range (0,1]");
        process::exit(1);
    }

    if rec_count == 0 {
        eprintln!("Recommendation count must be at least 1");
        process::exit(1);
    }

    let metric = metric_or_exit(&metric);
    let rec_metric = metric_or_exit(&rec_metric);

    Arguments {
        input_file_path,
        output_rules_path,
        country,
        min_support,
        metric,
        min_threshold,
        recommend,
        rec_metric,
        rec_count,
        use_descriptions,
    }
}

fn metric_or_exit(name: &str) -> Metric {
    match Metric::from_str(name) {
        Ok(metric) => metric,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(1);
        }
    }
}
