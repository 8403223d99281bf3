// ABOUTME: Caseless collation used for sorting and uniqueness checks
// ABOUTME: Also holds the grouping/ordering rules the list views depend on

use std::cmp::Ordering;
use std::collections::BTreeMap;

use caseless::Caseless;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::{Category, Service, ServiceGroup, UNCATEGORIZED};

/// Compare two strings ignoring case.
///
/// Both sides are case folded (full folding, so "Straße" matches "STRASSE") and
/// canonically decomposed, so precomposed and combining spellings are equal.
/// Base letters decide the order first and accents second: "Émile" sorts
/// between "Dave" and "Frigate", and "resume" before "résumé".
pub fn caseless_cmp(a: &str, b: &str) -> Ordering {
    let (a, b) = (fold(a), fold(b));
    base_letters(&a)
        .cmp(base_letters(&b))
        .then_with(|| a.cmp(&b))
}

/// Caseless equality under the same rules as [`caseless_cmp`]
pub fn caseless_eq(a: &str, b: &str) -> bool {
    fold(a) == fold(b)
}

/// Canonical caseless form: NFD(fold(NFD(s)))
fn fold(s: &str) -> String {
    s.nfd().default_case_fold().nfd().collect()
}

fn base_letters(folded: &str) -> impl Iterator<Item = char> + '_ {
    folded.chars().filter(|c| !is_combining_mark(*c))
}

/// Caseless order with exact comparison as the tie-breaker, so strings that
/// differ only in case still sort deterministically.
fn display_cmp(a: &str, b: &str) -> Ordering {
    caseless_cmp(a, b).then_with(|| a.cmp(b))
}

/// Display key for a service's category
pub fn group_key(category: Option<&str>) -> &str {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c,
        _ => UNCATEGORIZED,
    }
}

/// Group services by category and sort groups and members caselessly.
///
/// Input order is the tie-breaker for members with equal names, so callers
/// should pass services in insertion order.
pub fn group_services(services: Vec<Service>) -> Vec<ServiceGroup> {
    let mut groups: BTreeMap<String, Vec<Service>> = BTreeMap::new();
    for service in services {
        let key = group_key(service.category.as_deref()).to_string();
        groups.entry(key).or_default().push(service);
    }

    let mut groups: Vec<ServiceGroup> = groups
        .into_iter()
        .map(|(category, mut services)| {
            services.sort_by(|a, b| caseless_cmp(&a.name, &b.name));
            ServiceGroup { category, services }
        })
        .collect();
    groups.sort_by(|a, b| display_cmp(&a.category, &b.category));
    groups
}

/// Sort categories caselessly by name, ascending
pub fn sort_categories(categories: &mut [Category]) {
    categories.sort_by(|a, b| display_cmp(&a.name, &b.name));
}

/// Sort names caselessly and drop caseless duplicates, keeping the first seen
pub fn sorted_unique_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for name in names {
        if !unique.iter().any(|existing| caseless_eq(existing, &name)) {
            unique.push(name);
        }
    }
    unique.sort_by(|a, b| display_cmp(a, b));
    unique
}
