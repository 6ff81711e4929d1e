use crate::error::{ReplotError, ReplotResult};

use super::dispatch::UpdateDispatcher;

/// hg19 chromosome names and base-pair lengths, in genome order.
const HG19: [(&str, u64); 25] = [
    ("1", 249_250_621),
    ("2", 243_199_373),
    ("3", 198_022_430),
    ("4", 191_154_276),
    ("5", 180_915_260),
    ("6", 171_115_067),
    ("7", 159_138_663),
    ("8", 146_364_022),
    ("9", 141_213_431),
    ("10", 135_534_747),
    ("11", 135_006_516),
    ("12", 133_851_895),
    ("13", 115_169_878),
    ("14", 107_349_540),
    ("15", 102_531_392),
    ("16", 90_354_753),
    ("17", 81_195_210),
    ("18", 78_077_248),
    ("19", 59_128_983),
    ("20", 63_025_520),
    ("21", 48_129_895),
    ("22", 51_304_566),
    ("X", 155_270_560),
    ("Y", 59_373_566),
    ("M", 16_571),
];

/// Scale over genomic coordinates.
///
/// Unlike the value scales this one is not domain-based: it holds the fixed
/// chromosome order with one `[start, end)` interval per chromosome, plus a
/// filtered subset of both. Its main job is mapping a `(chromosome,
/// position)` pair onto a normalized `[0, 1]` ratio across either the whole
/// genome or the filtered portion.
#[derive(Debug)]
pub struct GenomeScale {
    id: String,
    name: String,
    chromosomes: Vec<String>,
    chromosomes_filtered: Vec<String>,
    domains: Vec<(u64, u64)>,
    domains_filtered: Vec<(u64, u64)>,
    dispatcher: UpdateDispatcher,
}

impl GenomeScale {
    /// Creates a genome scale covering the full hg19 assembly.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let chromosomes: Vec<String> = HG19.iter().map(|(name, _)| (*name).to_owned()).collect();
        let domains: Vec<(u64, u64)> = HG19.iter().map(|(_, length)| (0, *length)).collect();
        Self {
            id: id.into(),
            name: name.into(),
            chromosomes_filtered: chromosomes.clone(),
            chromosomes,
            domains_filtered: domains.clone(),
            domains,
            dispatcher: UpdateDispatcher::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn chromosomes(&self) -> &[String] {
        &self.chromosomes
    }

    #[must_use]
    pub fn chromosomes_filtered(&self) -> &[String] {
        &self.chromosomes_filtered
    }

    /// `[start, end)` interval for one chromosome.
    #[must_use]
    pub fn domain(&self, chromosome: &str) -> Option<(u64, u64)> {
        let index = position_of(&self.chromosomes, chromosome)?;
        self.domains.get(index).copied()
    }

    #[must_use]
    pub fn domains(&self) -> &[(u64, u64)] {
        &self.domains
    }

    /// `[start, end)` interval for one chromosome in the filtered set.
    #[must_use]
    pub fn domain_filtered(&self, chromosome: &str) -> Option<(u64, u64)> {
        let index = position_of(&self.chromosomes_filtered, chromosome)?;
        self.domains_filtered.get(index).copied()
    }

    #[must_use]
    pub fn domains_filtered(&self) -> &[(u64, u64)] {
        &self.domains_filtered
    }

    /// Each chromosome's share of the total genome length.
    #[must_use]
    pub fn chromosome_ratios(&self) -> Vec<f64> {
        ratios(&self.domains)
    }

    /// Each filtered chromosome's share of the filtered total length.
    #[must_use]
    pub fn chromosome_ratios_filtered(&self) -> Vec<f64> {
        ratios(&self.domains_filtered)
    }

    /// Running-total ratios marking where each chromosome starts, for
    /// drawing chromosome boundaries. The first entry is always `0`.
    #[must_use]
    pub fn chromosome_ratios_cumulative(&self) -> Vec<f64> {
        cumulative(&self.chromosome_ratios())
    }

    #[must_use]
    pub fn chromosome_ratios_cumulative_filtered(&self) -> Vec<f64> {
        cumulative(&self.chromosome_ratios_filtered())
    }

    /// Maps a genomic position onto `[0, 1]` across the whole genome: the
    /// summed lengths of all earlier chromosomes plus the in-chromosome
    /// offset, over the total genome length.
    pub fn convert_position_to_ratio(&self, chromosome: &str, position: u64) -> ReplotResult<f64> {
        position_to_ratio(&self.chromosomes, &self.domains, chromosome, position)
    }

    /// Like [`GenomeScale::convert_position_to_ratio`] but over the filtered
    /// chromosome set, with the filtered total length as denominator.
    pub fn convert_position_to_ratio_filtered(
        &self,
        chromosome: &str,
        position: u64,
    ) -> ReplotResult<f64> {
        position_to_ratio(
            &self.chromosomes_filtered,
            &self.domains_filtered,
            chromosome,
            position,
        )
    }

    /// Display label for a genomic position, e.g. `chr5:1,234,567`.
    #[must_use]
    pub fn to_human(&self, chromosome: &str, position: u64) -> String {
        format!("chr{chromosome}:{}", group_thousands(position))
    }

    /// Restricts the filtered set to one full-length chromosome.
    pub fn filter_by_chromosome(&mut self, chromosome: &str) -> ReplotResult<()> {
        let index = position_of(&self.chromosomes, chromosome)
            .ok_or_else(|| ReplotError::UnknownChromosome(chromosome.to_owned()))?;
        self.chromosomes_filtered = vec![chromosome.to_owned()];
        self.domains_filtered = vec![self.domains[index]];
        self.dispatcher.emit_update();
        Ok(())
    }

    /// Restricts the filtered set to a sub-interval of one chromosome. The
    /// interval is taken as given, without clamping to chromosome bounds,
    /// but must not be inverted.
    pub fn filter_by_chromosome_and_position(
        &mut self,
        chromosome: &str,
        start: u64,
        end: u64,
    ) -> ReplotResult<()> {
        if position_of(&self.chromosomes, chromosome).is_none() {
            return Err(ReplotError::UnknownChromosome(chromosome.to_owned()));
        }
        if start > end {
            return Err(ReplotError::InvalidData(format!(
                "chromosome interval start must not exceed end, got [{start}, {end})"
            )));
        }
        self.chromosomes_filtered = vec![chromosome.to_owned()];
        self.domains_filtered = vec![(start, end)];
        self.dispatcher.emit_update();
        Ok(())
    }

    /// Restores the filtered set to the full genome.
    pub fn reset(&mut self) {
        self.chromosomes_filtered = self.chromosomes.clone();
        self.domains_filtered = self.domains.clone();
        self.dispatcher.emit_update();
    }

    pub fn on_update(&mut self, subscriber: impl Into<String>, callback: impl FnMut() + 'static) {
        self.dispatcher.on_update(subscriber, callback);
    }

    pub fn unsubscribe(&mut self, subscriber: &str) {
        self.dispatcher.unsubscribe(subscriber);
    }

    pub fn emit_update(&mut self) {
        self.dispatcher.emit_update();
    }
}

fn position_of(chromosomes: &[String], chromosome: &str) -> Option<usize> {
    chromosomes.iter().position(|name| name == chromosome)
}

fn span_sum(domains: &[(u64, u64)]) -> f64 {
    domains
        .iter()
        .map(|(start, end)| (end - start) as f64)
        .sum()
}

fn ratios(domains: &[(u64, u64)]) -> Vec<f64> {
    let total = span_sum(domains);
    domains
        .iter()
        .map(|(start, end)| (end - start) as f64 / total)
        .collect()
}

fn cumulative(ratios: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(ratios.len());
    let mut current = 0.0;
    for ratio in ratios {
        out.push(current);
        current += ratio;
    }
    out
}

fn position_to_ratio(
    chromosomes: &[String],
    domains: &[(u64, u64)],
    chromosome: &str,
    position: u64,
) -> ReplotResult<f64> {
    let index = position_of(chromosomes, chromosome)
        .ok_or_else(|| ReplotError::UnknownChromosome(chromosome.to_owned()))?;
    let preceding: f64 = span_sum(&domains[..index]);
    let offset = position as f64 - domains[index].0 as f64;
    Ok((preceding + offset) / span_sum(domains))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}
