//! Basic usage example for the statkit library.
//!
//! This example walks through the three analyses: describing a typed-in
//! sample, an ANOVA on a block-by-treatment table read as text, and X-bar/R
//! control limits for a set of subgroups.

use statkit::doe::{AnovaConfig, Design, WideTable};
use statkit::spc::SubgroupTable;
use statkit::utils::parse_number_list;
use statkit::{compute_anova, compute_control_limits, describe};

fn main() {
    println!("statkit - Basic Usage Example\n");

    // Descriptive statistics from a comma-separated list
    let sample = parse_number_list("12.5, 14, 9.75, 14, 11, 13.25").expect("Invalid number list");
    let summary = describe(&sample).expect("Failed to describe sample");
    println!("Descriptive statistics:");
    println!("{summary}");

    // A typo surfaces as an error instead of being dropped
    match parse_number_list("1, 2, tree") {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("Rejected input: {e}\n"),
    }

    // Yield of three fertilizers in four fields
    let header = ["Field", "Control", "Nitrogen", "Compost"];
    let rows = vec![
        vec!["North", "20.1", "24.3", "22.0"],
        vec!["South", "18.7", "23.9", "21.4"],
        vec!["East", "21.5", "26.0", "23.2"],
        vec!["West", "19.0", "23.1", "20.8"],
    ];
    let table = WideTable::parse(&header, &rows).expect("Failed to parse table");

    for design in [Design::Crd, Design::Rbd] {
        let result = compute_anova(&table, &AnovaConfig::new(design)).expect("ANOVA failed");
        println!("{design} ANOVA:");
        println!("{result}");
        if result.reject_null() {
            println!("=> Reject H0: treatment means differ\n");
        } else {
            println!("=> Accept H0: no evidence that treatment means differ\n");
        }
    }

    // Five subgroups of five measurements each
    let subgroups = SubgroupTable::from_columns(&[
        vec![10.2, 9.9, 10.1, 10.0, 9.8],
        vec![10.1, 10.3, 9.7, 10.0, 10.2],
        vec![9.9, 10.0, 10.4, 10.1, 9.6],
        vec![10.0, 10.2, 9.9, 9.8, 10.1],
        vec![10.6, 10.9, 10.7, 11.0, 10.8],
    ])
    .expect("Subgroups must share a size");
    let limits = compute_control_limits(&subgroups).expect("Unsupported subgroup size");

    println!("Control limits:");
    println!("{limits}");
    println!("Subgroup means:  {:?}", limits.subgroup_means);
    println!("Subgroup ranges: {:?}", limits.subgroup_ranges);

    let flagged = limits.out_of_control_means();
    if flagged.is_empty() {
        println!("All subgroup means within limits");
    } else {
        println!("Subgroups out of control (X-bar): {flagged:?}");
    }
}
