//! Experience processing - turns queued experiences into occasional insights.
//!
//! Processing works as follows:
//! 1. **Quality**: base quality for the category plus `complexity * 0.2`, clamped
//! 2. **Bucket**: the quality value is classified into a [`QualityBucket`]
//! 3. **Gate**: buckets weighing less than 0.6 never yield insights
//! 4. **Draw**: an insight occurs with probability `quality * 0.7 + complexity * 0.3`
//! 5. **Insight**: significance is the quality scaled by a uniform draw in [0.7, 1.0]
//!
//! Producing no insight is the common outcome and is not an error.

mod insight;

pub use insight::*;

use bridge_rules::{ExperienceKind, QualityBucket};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complexity assumed when an experience does not state one.
pub const DEFAULT_COMPLEXITY: f64 = 0.5;

/// Sequential identifier of an experience within one bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExperienceId(pub u64);

/// An experience waiting to be processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub kind: ExperienceKind,
    /// Complexity from 0.0 to 1.0.
    pub complexity: f64,
    /// Opaque payload, carried into any resulting insight.
    #[serde(default)]
    pub content: serde_json::Value,
}

impl Experience {
    /// Create an experience with empty content. Complexity is clamped into [0.0, 1.0].
    pub fn new(kind: ExperienceKind, complexity: f64) -> Self {
        let complexity = if complexity.is_nan() {
            DEFAULT_COMPLEXITY
        } else {
            complexity.clamp(0.0, 1.0)
        };
        Self {
            kind,
            complexity,
            content: serde_json::Value::Null,
        }
    }

    /// Set the content payload.
    pub fn with_content(mut self, content: serde_json::Value) -> Self {
        self.content = content;
        self
    }

    /// Read an experience from loosely structured data:
    /// `{ "type": "challenge", "complexity": 0.7, "content": { .. } }`.
    ///
    /// A missing or unrecognized type becomes routine; a missing complexity is 0.5.
    pub fn from_value(data: &serde_json::Value) -> Self {
        let kind = data
            .get("type")
            .and_then(|v| v.as_str())
            .map(ExperienceKind::parse)
            .unwrap_or_default();
        let complexity = data
            .get("complexity")
            .and_then(|v| v.as_f64())
            .unwrap_or(DEFAULT_COMPLEXITY);
        let content = data.get("content").cloned().unwrap_or_default();

        Self::new(kind, complexity).with_content(content)
    }
}

/// An experience as remembered by the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub id: ExperienceId,
    /// Tick at which the experience was added.
    pub tick: u64,
    pub experience: Experience,
    pub processed: bool,
}

/// Quality values seen for one experience category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct QualityStats {
    pub count: u64,
    pub total: f64,
    pub min: f64,
    pub max: f64,
}

impl QualityStats {
    fn record(&mut self, quality: f64) {
        if self.count == 0 {
            self.min = quality;
            self.max = quality;
        } else {
            self.min = self.min.min(quality);
            self.max = self.max.max(quality);
        }
        self.count += 1;
        self.total += quality;
    }

    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Running totals of the processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProcessorStats {
    pub processed: u64,
    pub insights: u64,
    pub significance_total: f64,
    /// Quality per experience category.
    #[serde(default)]
    pub quality: BTreeMap<ExperienceKind, QualityStats>,
    /// Processed experiences per quality bucket.
    #[serde(default)]
    pub buckets: BTreeMap<QualityBucket, u64>,
}

impl ProcessorStats {
    /// Mean significance of all insights produced, 0.0 when none.
    pub fn average_significance(&self) -> f64 {
        if self.insights == 0 {
            0.0
        } else {
            self.significance_total / self.insights as f64
        }
    }

    /// Mean quality across every processed experience, 0.0 when none.
    pub fn average_quality(&self) -> f64 {
        let (count, total) = self
            .quality
            .values()
            .fold((0, 0.0), |(count, total), q| (count + q.count, total + q.total));
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExperienceProcessor {
    stats: ProcessorStats,
    last_insight_id: u64,
}

impl ExperienceProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume with previously accumulated totals.
    pub fn with_stats(stats: ProcessorStats) -> Self {
        Self {
            last_insight_id: stats.insights,
            stats,
        }
    }

    /// Continue insight ids after `last`, if that is past the current id.
    pub fn with_last_insight_id(mut self, last: u64) -> Self {
        self.last_insight_id = self.last_insight_id.max(last);
        self
    }

    pub fn stats(&self) -> &ProcessorStats {
        &self.stats
    }

    /// Id of the most recent insight, 0 before the first.
    pub fn last_insight_id(&self) -> InsightId {
        InsightId(self.last_insight_id)
    }

    /// Continuous quality value of an experience, in [0.0, 1.0].
    pub fn quality_value(experience: &Experience) -> f64 {
        (experience.kind.base_quality() + experience.complexity * 0.2).clamp(0.0, 1.0)
    }

    /// Process one experience at `current_tick`, maybe producing an insight.
    pub fn process<R: Rng + ?Sized>(
        &mut self,
        experience: &Experience,
        current_tick: u64,
        rng: &mut R,
    ) -> Option<Insight> {
        let quality = Self::quality_value(experience);
        self.evaluate(experience, quality, QualityBucket::from_value(quality), current_tick, rng)
    }

    /// Process with a forced quality bucket; the bucket weight stands in for
    /// the quality value.
    pub fn process_with_quality<R: Rng + ?Sized>(
        &mut self,
        experience: &Experience,
        bucket: QualityBucket,
        current_tick: u64,
        rng: &mut R,
    ) -> Option<Insight> {
        self.evaluate(experience, bucket.weight(), bucket, current_tick, rng)
    }

    fn evaluate<R: Rng + ?Sized>(
        &mut self,
        experience: &Experience,
        quality: f64,
        bucket: QualityBucket,
        current_tick: u64,
        rng: &mut R,
    ) -> Option<Insight> {
        self.stats.processed += 1;
        self.stats.quality.entry(experience.kind).or_default().record(quality);
        *self.stats.buckets.entry(bucket).or_default() += 1;

        if !bucket.yields_insights() {
            return None;
        }

        let probability = quality * 0.7 + experience.complexity * 0.3;
        if rng.gen::<f64>() >= probability {
            return None;
        }

        let significance = (quality * rng.gen_range(0.7..=1.0)).clamp(0.0, 1.0);
        let description = INSIGHT_PHRASES
            .choose(rng)
            .copied()
            .unwrap_or(INSIGHT_PHRASES[0]);

        self.stats.insights += 1;
        self.stats.significance_total += significance;
        self.last_insight_id += 1;

        Some(Insight {
            id: InsightId(self.last_insight_id),
            tick: current_tick,
            category: experience.kind,
            significance,
            description: description.to_string(),
            quality: bucket,
            source_content: experience.content.clone(),
            references: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_quality_value() {
        let novel = Experience::new(ExperienceKind::NovelDiscovery, 0.5);
        assert!((ExperienceProcessor::quality_value(&novel) - 0.9).abs() < 1e-9);

        let routine = Experience::new(ExperienceKind::Routine, 1.0);
        assert!((ExperienceProcessor::quality_value(&routine) - 0.6).abs() < 1e-9);

        let maxed = Experience::new(ExperienceKind::NovelDiscovery, 1.0);
        assert_eq!(ExperienceProcessor::quality_value(&maxed), 1.0);
    }

    #[test]
    fn test_low_quality_never_yields_insight() {
        let mut processor = ExperienceProcessor::new();
        let mut rng = StdRng::seed_from_u64(1);

        // Routine at complexity 0.4 has quality 0.48: shallow bucket.
        let routine = Experience::new(ExperienceKind::Routine, 0.4);
        for tick in 0..500 {
            assert!(processor.process(&routine, tick, &mut rng).is_none());
        }
        assert_eq!(processor.stats().processed, 500);
        assert_eq!(processor.stats().insights, 0);
    }

    #[test]
    fn test_high_quality_yields_insights() {
        let mut processor = ExperienceProcessor::new();
        let mut rng = StdRng::seed_from_u64(7);

        // Quality 1.0 and complexity 1.0 give probability 1.0.
        let novel = Experience::new(ExperienceKind::NovelDiscovery, 1.0)
            .with_content(serde_json::json!({ "topic": "stars" }));

        for tick in 1..=50 {
            let insight = processor
                .process(&novel, tick, &mut rng)
                .expect("certain insight");
            assert_eq!(insight.tick, tick);
            assert_eq!(insight.category, ExperienceKind::NovelDiscovery);
            assert_eq!(insight.quality, QualityBucket::Profound);
            assert!(insight.significance >= 0.7 && insight.significance <= 1.0);
            assert!(INSIGHT_PHRASES.contains(&insight.description.as_str()));
            assert_eq!(insight.source_content["topic"], "stars");
        }

        let stats = processor.stats();
        assert_eq!(stats.insights, 50);
        assert!(stats.average_significance() >= 0.7);
    }

    #[test]
    fn test_insight_ids_are_sequential() {
        let mut processor = ExperienceProcessor::new();
        let mut rng = StdRng::seed_from_u64(3);
        let novel = Experience::new(ExperienceKind::NovelDiscovery, 1.0);

        let first = processor.process(&novel, 1, &mut rng).unwrap();
        let second = processor.process(&novel, 2, &mut rng).unwrap();
        assert_eq!(first.id, InsightId(1));
        assert_eq!(second.id, InsightId(2));
    }

    #[test]
    fn test_insight_ids_resume_after_last() {
        let mut rng = StdRng::seed_from_u64(3);
        let novel = Experience::new(ExperienceKind::NovelDiscovery, 1.0);

        let mut processor =
            ExperienceProcessor::with_stats(ProcessorStats::default()).with_last_insight_id(3);
        assert_eq!(processor.last_insight_id(), InsightId(3));
        let insight = processor.process(&novel, 1, &mut rng).unwrap();
        assert_eq!(insight.id, InsightId(4));
        assert_eq!(processor.stats().insights, 1);

        let stats = ProcessorStats {
            insights: 9,
            ..ProcessorStats::default()
        };
        let processor = ExperienceProcessor::with_stats(stats).with_last_insight_id(2);
        assert_eq!(processor.last_insight_id(), InsightId(9));
    }

    #[test]
    fn test_quality_stats_per_category_and_bucket() {
        let mut processor = ExperienceProcessor::new();
        let mut rng = StdRng::seed_from_u64(8);

        // Challenge qualities 0.7 and 0.8 are deep; novel at 1.0 is profound.
        processor.process(&Experience::new(ExperienceKind::Challenge, 0.0), 1, &mut rng);
        processor.process(&Experience::new(ExperienceKind::Challenge, 0.5), 2, &mut rng);
        processor.process(&Experience::new(ExperienceKind::NovelDiscovery, 1.0), 3, &mut rng);
        // Quality 0.4: shallow.
        processor.process(&Experience::new(ExperienceKind::Routine, 0.0), 4, &mut rng);

        let stats = processor.stats();
        let challenge = stats.quality[&ExperienceKind::Challenge];
        assert_eq!(challenge.count, 2);
        assert!((challenge.min - 0.7).abs() < 1e-9);
        assert!((challenge.max - 0.8).abs() < 1e-9);
        assert!((challenge.average() - 0.75).abs() < 1e-9);
        assert_eq!(stats.quality[&ExperienceKind::Routine].count, 1);
        assert!(!stats.quality.contains_key(&ExperienceKind::Dialogue));

        assert_eq!(stats.buckets[&QualityBucket::Deep], 2);
        assert_eq!(stats.buckets[&QualityBucket::Profound], 1);
        assert_eq!(stats.buckets[&QualityBucket::Shallow], 1);
        assert!((stats.average_quality() - 0.725).abs() < 1e-9);

        assert_eq!(ProcessorStats::default().average_quality(), 0.0);
    }

    #[test]
    fn test_moderate_quality_is_probabilistic() {
        let mut processor = ExperienceProcessor::new();
        let mut rng = StdRng::seed_from_u64(11);

        // Dialogue at complexity 0.0: quality 0.6, probability 0.42.
        let dialogue = Experience::new(ExperienceKind::Dialogue, 0.0);
        let produced = (0..2_000)
            .filter(|tick| processor.process(&dialogue, *tick, &mut rng).is_some())
            .count();

        assert!(produced > 600 && produced < 1_100, "produced {}", produced);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let experience = Experience::new(ExperienceKind::Challenge, 0.3);
        let run = |seed: u64| {
            let mut processor = ExperienceProcessor::new();
            let mut rng = StdRng::seed_from_u64(seed);
            (0..200)
                .map(|tick| processor.process(&experience, tick, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_forced_quality() {
        let mut processor = ExperienceProcessor::new();
        let mut rng = StdRng::seed_from_u64(5);
        let experience = Experience::new(ExperienceKind::NovelDiscovery, 1.0);

        let none = processor.process_with_quality(&experience, QualityBucket::Shallow, 1, &mut rng);
        assert!(none.is_none());

        let insight = processor
            .process_with_quality(&experience, QualityBucket::Profound, 2, &mut rng)
            .unwrap();
        assert_eq!(insight.quality, QualityBucket::Profound);
    }

    #[test]
    fn test_from_value() {
        let data = serde_json::json!({
            "type": "challenge",
            "complexity": 0.9,
            "content": { "puzzle": "riddle" }
        });
        let exp = Experience::from_value(&data);
        assert_eq!(exp.kind, ExperienceKind::Challenge);
        assert!((exp.complexity - 0.9).abs() < 1e-9);
        assert_eq!(exp.content["puzzle"], "riddle");

        let unknown = Experience::from_value(&serde_json::json!({ "type": "dream" }));
        assert_eq!(unknown.kind, ExperienceKind::Routine);
        assert_eq!(unknown.complexity, DEFAULT_COMPLEXITY);

        let clamped = Experience::from_value(&serde_json::json!({ "complexity": 3.0 }));
        assert_eq!(clamped.complexity, 1.0);
    }
}
