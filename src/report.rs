use std::cmp::Ordering;
use std::io::{self, Write};

use serde::Serialize;

use crate::brute::{AssociationRule, FrequentItemsets, Itemset, RuleStats};
use crate::error::Result;
use crate::harness::{Comparison, ReferenceRun, Speedup, Timing};
use crate::store::TransactionStore;

const RULE_WIDTH: usize = 140;
const LABEL_WIDTH: usize = 120;

pub const NO_ASSOCIATION_MESSAGE: &str =
    "Couldn't find required association with given support and confidence";

/// Brute-force itemsets by descending support, then ascending size.
pub fn sorted_itemsets<'a>(
    store: &TransactionStore,
    itemsets: &'a FrequentItemsets,
) -> Vec<(&'a Itemset, f64)> {
    let mut sorted: Vec<(&Itemset, f64)> = itemsets.iter().collect();
    sorted.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then(a.0.len().cmp(&b.0.len()))
            .then_with(|| store.format_itemset(a.0).cmp(&store.format_itemset(b.0)))
    });
    sorted
}

/// Rules by descending confidence.
pub fn sorted_rules<'a>(
    store: &TransactionStore,
    rules: &'a [AssociationRule],
) -> Vec<&'a AssociationRule> {
    let mut sorted: Vec<&AssociationRule> = rules.iter().collect();
    sorted.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| format_rule(store, a).cmp(&format_rule(store, b)))
    });
    sorted
}

pub fn format_rule(store: &TransactionStore, rule: &AssociationRule) -> String {
    format!(
        "{} => {}",
        store.format_itemset(&rule.antecedent),
        store.format_itemset(&rule.consequent)
    )
}

fn count_of(support: f64, num_transactions: usize) -> usize {
    (support * num_transactions as f64).round() as usize
}

fn write_rule_line<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

fn write_itemset_table<'a, W, I>(
    out: &mut W,
    store: &TransactionStore,
    rows: I,
    num_transactions: usize,
) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a Itemset, f64)>,
{
    writeln!(out, "\nFrequent Itemsets:")?;
    write_rule_line(out)?;
    writeln!(out, "{:<LABEL_WIDTH$} {:<10} {:<12}", "Itemset", "Count", "Support (%)")?;
    write_rule_line(out)?;
    for (itemset, support) in rows {
        writeln!(
            out,
            "{:<LABEL_WIDTH$} {:<10} {:.2}%",
            store.format_itemset(itemset),
            count_of(support, num_transactions),
            support * 100.0
        )?;
    }
    Ok(())
}

fn write_rule_table<'a, W, I>(out: &mut W, store: &TransactionStore, rules: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a AssociationRule>,
{
    writeln!(out, "\nAssociation Rules:")?;
    write_rule_line(out)?;
    writeln!(out, "{:<LABEL_WIDTH$} {:<12} {:<12}", "Rule", "Support (%)", "Confidence (%)")?;
    write_rule_line(out)?;
    for rule in rules {
        writeln!(
            out,
            "{:<LABEL_WIDTH$} {:.2}% \t {:.2}%",
            format_rule(store, rule),
            rule.support * 100.0,
            rule.confidence * 100.0
        )?;
    }
    Ok(())
}

pub fn write_brute_force<W: Write>(
    out: &mut W,
    store: &TransactionStore,
    itemsets: &FrequentItemsets,
    rules: &[AssociationRule],
) -> io::Result<()> {
    writeln!(out, "\n=== Brute Force Algorithm Results ===")?;
    write_itemset_table(
        out,
        store,
        sorted_itemsets(store, itemsets),
        itemsets.num_transactions(),
    )?;
    write_rule_table(out, store, sorted_rules(store, rules))
}

pub fn write_reference<W: Write>(
    out: &mut W,
    store: &TransactionStore,
    run: &ReferenceRun,
    num_transactions: usize,
) -> io::Result<()> {
    writeln!(out, "\n=== {} Algorithm Results ===", run.engine)?;
    writeln!(out, "Total Frequent Itemsets Found: {}", run.itemsets.len())?;
    write_itemset_table(
        out,
        store,
        run.itemsets.iter().map(|(itemset, support)| (itemset, *support)),
        num_transactions,
    )?;
    writeln!(out, "\nTotal Association Rules Generated: {}", run.rules.len())?;
    write_rule_table(out, store, &run.rules)
}

fn write_timing<W: Write>(out: &mut W, label: &str, timing: &Timing) -> io::Result<()> {
    writeln!(
        out,
        "{:<24}{:.6} seconds",
        format!("{label} Total Time:"),
        timing.total().as_secs_f64()
    )?;
    writeln!(
        out,
        "  - Frequent Itemsets: {:.6} seconds",
        timing.itemsets.as_secs_f64()
    )?;
    writeln!(
        out,
        "  - Association Rules: {:.6} seconds",
        timing.rules.as_secs_f64()
    )
}

pub fn write_performance<W: Write>(out: &mut W, comparison: &Comparison) -> io::Result<()> {
    let Ok(reference) = &comparison.reference else {
        return Ok(());
    };

    writeln!(out, "\n=== Performance Comparison ===")?;
    write_timing(out, "Brute Force", &comparison.brute.timing)?;
    write_timing(out, reference.engine, &reference.timing)?;

    match comparison.speedup() {
        Some(Speedup::BruteForce(ratio)) => writeln!(out, "Brute Force was {ratio:.2}x faster!"),
        Some(Speedup::Reference(ratio)) => {
            writeln!(out, "{} was {ratio:.2}x faster!", reference.engine)
        }
        Some(Speedup::Unmeasurable) | None => {
            writeln!(out, "Run times were too short to compare.")
        }
    }
}

pub fn write_parity<W: Write>(out: &mut W, comparison: &Comparison) -> io::Result<()> {
    let Ok(reference) = &comparison.reference else {
        return Ok(());
    };

    writeln!(out, "\n=== Results Comparison ===")?;
    writeln!(
        out,
        "Brute Force: {} frequent itemsets, {} rules",
        comparison.brute.itemsets.len(),
        comparison.brute.rules.len()
    )?;
    writeln!(
        out,
        "{:<13}{} frequent itemsets, {} rules",
        format!("{}:", reference.engine),
        reference.itemsets.len(),
        reference.rules.len()
    )?;

    if comparison.counts_match() == Some(true) {
        writeln!(out, "Both algorithms produced the same number of results!")
    } else {
        writeln!(out, "Results differ between the algorithms.")?;
        writeln!(
            out,
            "This might be due to implementation details or handling of edge cases."
        )
    }
}

/// The full text report for one comparison.
pub fn write_text<W: Write>(
    out: &mut W,
    store: &TransactionStore,
    comparison: &Comparison,
) -> io::Result<()> {
    write_brute_force(
        out,
        store,
        &comparison.brute.itemsets,
        &comparison.brute.rules,
    )?;

    match &comparison.reference {
        Ok(run) => write_reference(out, store, run, comparison.num_transactions)?,
        Err(_) => writeln!(out, "\n{NO_ASSOCIATION_MESSAGE}")?,
    }

    write_performance(out, comparison)?;
    write_parity(out, comparison)?;
    writeln!(out, "\n{}", "=".repeat(60))
}

#[derive(Debug, Serialize)]
pub struct ItemsetRow {
    pub items: Vec<String>,
    pub count: usize,
    pub support: f64,
}

#[derive(Debug, Serialize)]
pub struct RuleRow {
    pub antecedent: Vec<String>,
    pub consequent: Vec<String>,
    pub support: f64,
    pub confidence: f64,
}

#[derive(Debug, Serialize)]
pub struct EngineSummary {
    pub engine: String,
    pub timing: Timing,
    pub itemsets: Vec<ItemsetRow>,
    pub rules: Vec<RuleRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_stats: Option<RuleStats>,
}

/// Machine-readable form of a [`Comparison`].
#[derive(Debug, Serialize)]
pub struct Summary {
    pub min_support: f64,
    pub min_confidence: f64,
    pub transactions: usize,
    pub brute_force: EngineSummary,
    pub reference: Option<EngineSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_error: Option<String>,
    pub speedup: Option<Speedup>,
    pub counts_match: Option<bool>,
}

fn names(store: &TransactionStore, itemset: &Itemset) -> Vec<String> {
    store
        .names_of(itemset)
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn rule_rows(store: &TransactionStore, rules: &[&AssociationRule]) -> Vec<RuleRow> {
    rules
        .iter()
        .map(|rule| RuleRow {
            antecedent: names(store, &rule.antecedent),
            consequent: names(store, &rule.consequent),
            support: rule.support,
            confidence: rule.confidence,
        })
        .collect()
}

impl Summary {
    pub fn new(store: &TransactionStore, comparison: &Comparison) -> Self {
        let n = comparison.num_transactions;
        let brute = &comparison.brute;

        let brute_force = EngineSummary {
            engine: "Brute Force".to_owned(),
            timing: brute.timing,
            itemsets: sorted_itemsets(store, &brute.itemsets)
                .into_iter()
                .map(|(itemset, support)| ItemsetRow {
                    items: names(store, itemset),
                    count: count_of(support, n),
                    support,
                })
                .collect(),
            rules: rule_rows(store, &sorted_rules(store, &brute.rules)),
            rule_stats: Some(brute.stats),
        };

        let reference = comparison.reference.as_ref().ok().map(|run| EngineSummary {
            engine: run.engine.to_owned(),
            timing: run.timing,
            itemsets: run
                .itemsets
                .iter()
                .map(|(itemset, support)| ItemsetRow {
                    items: names(store, itemset),
                    count: count_of(*support, n),
                    support: *support,
                })
                .collect(),
            rules: rule_rows(store, &run.rules.iter().collect::<Vec<_>>()),
            rule_stats: None,
        });

        Self {
            min_support: comparison.thresholds.min_support,
            min_confidence: comparison.thresholds.min_confidence,
            transactions: n,
            brute_force,
            reference,
            reference_error: comparison.reference.as_ref().err().cloned(),
            speedup: comparison.speedup(),
            counts_match: comparison.counts_match(),
        }
    }
}

pub fn write_json<W: Write>(
    out: &mut W,
    store: &TransactionStore,
    comparison: &Comparison,
) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &Summary::new(store, comparison))?;
    writeln!(out)?;
    Ok(())
}
