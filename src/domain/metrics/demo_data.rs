//! Demo metric catalog and value generation
//!
//! The catalog describes which metrics each product module reports, the
//! baseline used by the deterministic wave generator, and the uniform range
//! used by the random generator. It backs the mock data source so the
//! dashboard can run without a real upstream.

use crate::domain::metrics::{
    constants::demo_generation,
    time_period::{DateRange, Granularity},
    values::round_ratio,
    MetricName, MetricValue, ModuleId, Observation, ObservationSet, Unit,
};
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a metric's random value is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RandomRange {
    /// Integer uniformly drawn from `min..=max`
    Integer { min: i64, max: i64 },
    /// `0..100` with two decimals
    Percentage,
    /// `0..scale` with two decimals
    Scaled { scale: f64 },
}

impl RandomRange {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Self::Integer { min, max } => rng.gen_range(min..=max) as f64,
            Self::Percentage => round_ratio(rng.gen::<f64>() * demo_generation::MAX_PERCENTAGE),
            Self::Scaled { scale } => round_ratio(rng.gen::<f64>() * scale),
        }
    }
}

/// One metric reported by a demo module
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoMetric {
    pub name: &'static str,
    pub unit: &'static str,
    /// Centre of the deterministic wave
    pub base: f64,
    pub random: RandomRange,
    /// Customer-segment share applied to absolute counts, rounded after scaling
    pub segment_share: Option<f64>,
}

impl DemoMetric {
    /// Value on `date` under the given mode
    pub fn value_at<R: Rng + ?Sized>(&self, date: NaiveDate, mode: GenerationMode, rng: &mut R) -> f64 {
        match (mode, self.segment_share) {
            (GenerationMode::Static, share) => {
                (static_wave(self.base, date) * share.unwrap_or(1.0)).round()
            }
            (GenerationMode::Random, Some(share)) => (self.random.sample(rng) * share).round(),
            (GenerationMode::Random, None) => self.random.sample(rng),
        }
    }
}

const fn int(name: &'static str, unit: &'static str, base: f64, min: i64, max: i64) -> DemoMetric {
    DemoMetric {
        name,
        unit,
        base,
        random: RandomRange::Integer { min, max },
        segment_share: None,
    }
}

/// Segment count: the whole-market count scaled by the segment's share
const fn share(name: &'static str, base: f64, min: i64, max: i64, fraction: f64) -> DemoMetric {
    DemoMetric {
        name,
        unit: "个",
        base,
        random: RandomRange::Integer { min, max },
        segment_share: Some(fraction),
    }
}

const fn pct(name: &'static str, base: f64) -> DemoMetric {
    DemoMetric {
        name,
        unit: "%",
        base,
        random: RandomRange::Percentage,
        segment_share: None,
    }
}

const fn tokens(base: f64) -> DemoMetric {
    DemoMetric {
        name: "Token消耗",
        unit: "万",
        base,
        random: RandomRange::Scaled { scale: 500.0 },
        segment_share: None,
    }
}

const PHARMACY_SHARE: f64 = 0.4;
const CLINIC_SHARE: f64 = 0.6;

// Whole market first, then the pharmacy and clinic segments
const PHOTO_INVENTORY: &[DemoMetric] = &[
    int("开放门店数", "个", 200.0, 150, 300),
    pct("开放门店占比", 85.0),
    int("活跃门店数", "个", 180.0, 100, 250),
    pct("活跃门店占比", 90.0),
    int("深度门店数", "个", 80.0, 50, 150),
    int("平均识别正确率", "%", 95.0, 80, 99),
    int("平均商品匹配正确率", "%", 88.0, 75, 95),
    pct("照片确认转化率", 82.0),
    pct("完成入库转化率", 70.0),
    share("开放门店数-药店", 200.0, 150, 300, PHARMACY_SHARE),
    pct("开放门店占比-药店", 85.0),
    share("活跃门店数-药店", 180.0, 100, 250, PHARMACY_SHARE),
    pct("活跃门店占比-药店", 90.0),
    share("深度门店数-药店", 80.0, 50, 150, PHARMACY_SHARE),
    int("平均识别正确率-药店", "%", 90.0, 85, 95),
    int("平均商品匹配正确率-药店", "%", 85.0, 80, 90),
    pct("照片确认转化率-药店", 82.0),
    pct("完成入库转化率-药店", 70.0),
    share("开放门店数-诊所", 200.0, 150, 300, CLINIC_SHARE),
    pct("开放门店占比-诊所", 85.0),
    share("活跃门店数-诊所", 180.0, 100, 250, CLINIC_SHARE),
    pct("活跃门店占比-诊所", 90.0),
    share("深度门店数-诊所", 80.0, 50, 150, CLINIC_SHARE),
    int("平均识别正确率-诊所", "%", 95.0, 80, 99),
    int("平均商品匹配正确率-诊所", "%", 88.0, 75, 95),
    pct("照片确认转化率-诊所", 82.0),
    pct("完成入库转化率-诊所", 70.0),
];

const AI_DIAGNOSIS: &[DemoMetric] = &[
    int("日使用诊所数", "个", 300.0, 200, 400),
    int("日使用医生数", "个", 850.0, 500, 1000),
    pct("诊所活跃率", 75.0),
    pct("医生活跃率", 65.0),
    int("采纳率", "%", 82.0, 60, 95),
    int("日使用-连续3天使用医生数", "人", 100.0, 50, 150),
    int("日使用-人均次数", "次", 5.0, 2, 10),
    pct("采纳情况-诊断/辩证采纳", 80.0),
    int("采纳情况-中西成药采纳", "次", 300.0, 100, 500),
    int("采纳情况-中药采纳", "次", 200.0, 100, 400),
    int("采纳情况-外治采纳", "次", 60.0, 20, 100),
    pct("药品匹配率", 92.0),
    int("治疗模型切换统计-中医", "次", 120.0, 50, 200),
    int("治疗模型切换统计-西医", "次", 180.0, 100, 300),
    int("开放用户数", "人", 1500.0, 1000, 2000),
    pct("开放用户占比", 95.0),
    tokens(120.0),
];

const VOICE_RECORDS: &[DemoMetric] = &[
    int("日使用诊所数", "个", 250.0, 150, 350),
    int("日使用医生数", "个", 600.0, 400, 800),
    int("病历生成次数", "次", 2200.0, 1000, 3000),
    int("采纳次数", "次", 1900.0, 800, 2500),
    int("采纳率", "%", 86.0, 70, 95),
    tokens(150.0),
];

const AI_TONGUE: &[DemoMetric] = &[
    int("日使用诊所数", "个", 150.0, 100, 250),
    int("日使用医生数", "个", 450.0, 300, 600),
    int("采纳次数", "次", 1200.0, 500, 1500),
    int("采纳率", "%", 78.0, 60, 90),
];

const PRE_CONSULTATION: &[DemoMetric] = &[
    int("开放门店数", "个", 150.0, 100, 200),
    int("开方用户数", "人", 350.0, 200, 500),
    int("活跃门店数", "个", 120.0, 80, 150),
    pct("完成转化率", 65.0),
    int("每日触发预问诊数", "次", 800.0, 500, 1000),
];

const TEST_RECOMMENDATION: &[DemoMetric] = &[
    int("使用医生数", "人", 200.0, 100, 300),
    int("推荐次数", "次", 1500.0, 1000, 2000),
    int("开出推荐项目次数", "次", 600.0, 300, 800),
    pct("推荐开出率", 40.0),
];

const TEST_INTERPRETATION: &[DemoMetric] = &[
    int("分析报告数量", "份", 350.0, 200, 500),
    int("查看报告详情次数", "次", 280.0, 150, 400),
    pct("查看率", 80.0),
];

const CATALOG: &[(&str, &[DemoMetric])] = &[
    ("photo_inventory", PHOTO_INVENTORY),
    ("ai_diagnosis", AI_DIAGNOSIS),
    ("voice_records", VOICE_RECORDS),
    ("ai_tongue", AI_TONGUE),
    ("pre_consultation", PRE_CONSULTATION),
    ("test_recommendation", TEST_RECOMMENDATION),
    ("test_interpretation", TEST_INTERPRETATION),
];

/// Module ids known to the demo catalog
pub fn module_ids() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(id, _)| *id)
}

/// Metrics reported by a module, `None` for unknown modules
pub fn metrics_for(module_id: &ModuleId) -> Option<&'static [DemoMetric]> {
    CATALOG
        .iter()
        .find(|(id, _)| *id == module_id.as_ref())
        .map(|(_, metrics)| *metrics)
}

/// Value generation strategy for demo data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Same date always yields the same value
    #[default]
    Static,
    /// Fresh uniform draw per observation
    Random,
}

/// Deterministic wave: `base + sin(day_index * 0.5) * base * 0.2`
///
/// `day_index` counts days since 2024-01-01 and may be negative.
fn static_wave(base: f64, date: NaiveDate) -> f64 {
    let (year, month, day) = demo_generation::STATIC_EPOCH;
    let day_index = NaiveDate::from_ymd_opt(year, month, day)
        .map(|epoch| date.signed_duration_since(epoch).num_days())
        .unwrap_or_default();
    let wave = (day_index as f64 * demo_generation::WAVE_FREQUENCY).sin();
    base + wave * base * demo_generation::WAVE_AMPLITUDE
}

/// Demo observation generator for one module
pub struct DemoDataGenerator {
    module_id: ModuleId,
    metrics: &'static [DemoMetric],
}

impl DemoDataGenerator {
    /// Generator for a catalog module, `None` if the module is unknown
    pub fn for_module(module_id: &ModuleId) -> Option<Self> {
        metrics_for(module_id).map(|metrics| Self {
            module_id: module_id.clone(),
            metrics,
        })
    }

    pub fn metrics(&self) -> &'static [DemoMetric] {
        self.metrics
    }

    /// Observations for every sample date of the range, in catalog order per date
    pub fn generate<R: Rng + ?Sized>(
        &self,
        range: &DateRange,
        granularity: Granularity,
        mode: GenerationMode,
        rng: &mut R,
    ) -> ObservationSet {
        let mut observations = Vec::with_capacity(self.metrics.len());
        for date in range.sample_dates(granularity) {
            for metric in self.metrics {
                let value = metric.value_at(date, mode, rng);
                if let Some(observation) = self.observation(metric, date, value) {
                    observations.push(observation);
                }
            }
        }
        ObservationSet::new(observations)
    }

    fn observation(&self, metric: &DemoMetric, date: NaiveDate, value: f64) -> Option<Observation> {
        Some(Observation::new(
            self.module_id.clone(),
            MetricName::try_new(metric.name.to_string()).ok()?,
            date,
            MetricValue::try_new(value).ok()?,
            Unit::try_new(metric.unit.to_string()).ok()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::observation::test_support::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn module(id: &str) -> ModuleId {
        ModuleId::try_new(id.to_string()).unwrap()
    }

    #[test]
    fn test_catalog_lists_seven_modules() {
        let ids: Vec<&str> = module_ids().collect();
        assert_eq!(ids.len(), 7);
        assert_eq!(ids[0], "photo_inventory");
        assert!(ids.contains(&"ai_diagnosis"));
        assert!(metrics_for(&module("photo_archive")).is_none());
    }

    #[test]
    fn test_photo_inventory_reports_three_segments() {
        let metrics = metrics_for(&module("photo_inventory")).unwrap();
        assert_eq!(metrics.len(), 27);
        assert_eq!(metrics[0].name, "开放门店数");
        assert_eq!(metrics[9].name, "开放门店数-药店");
        assert_eq!(metrics[18].name, "开放门店数-诊所");
        assert_eq!(metrics.iter().filter(|m| m.segment_share.is_some()).count(), 6);
    }

    #[test]
    fn test_segment_counts_scale_the_static_wave() {
        let metrics = metrics_for(&module("photo_inventory")).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let day = date("2024-01-03");
        // the wave for 200 on 2024-01-03 is 233.66; shares scale it before rounding
        assert_eq!(metrics[0].value_at(day, GenerationMode::Static, &mut rng), 234.0);
        assert_eq!(metrics[9].value_at(day, GenerationMode::Static, &mut rng), 93.0);
        assert_eq!(metrics[18].value_at(day, GenerationMode::Static, &mut rng), 140.0);
        // shares do not apply to rates
        assert_eq!(metrics[10].value_at(day, GenerationMode::Static, &mut rng), 99.0);
    }

    #[test]
    fn test_random_segment_counts_stay_within_scaled_range() {
        let metrics = metrics_for(&module("photo_inventory")).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            let pharmacy = metrics[9].value_at(date("2024-01-01"), GenerationMode::Random, &mut rng);
            assert!((60.0..=120.0).contains(&pharmacy));
            assert_eq!(pharmacy.fract(), 0.0);
        }
    }

    #[test]
    fn test_catalog_entries_are_valid_domain_values() {
        for id in module_ids() {
            for metric in metrics_for(&module(id)).unwrap() {
                assert!(MetricName::try_new(metric.name.to_string()).is_ok());
                assert!(Unit::try_new(metric.unit.to_string()).is_ok());
            }
        }
    }

    #[test]
    fn test_static_wave_is_anchored_at_epoch() {
        assert_eq!(static_wave(300.0, date("2024-01-01")), 300.0);
        // sin(1.0) * 60 = 50.49 -> 350
        assert_eq!(static_wave(300.0, date("2024-01-03")).round(), 350.0);
        assert!(static_wave(300.0, date("2023-12-30")) < 300.0);
    }

    #[test]
    fn test_static_generation_is_deterministic() {
        let generator = DemoDataGenerator::for_module(&module("ai_tongue")).unwrap();
        let range = DateRange::try_new(date("2024-01-01"), date("2024-01-07")).unwrap();
        let mut first_rng = StdRng::seed_from_u64(1);
        let mut second_rng = StdRng::seed_from_u64(2);

        let first = generator.generate(&range, Granularity::Day, GenerationMode::Static, &mut first_rng);
        let second = generator.generate(&range, Granularity::Day, GenerationMode::Static, &mut second_rng);

        assert_eq!(first, second);
        assert_eq!(first.len(), 7 * 4);
        assert_eq!(first.dates().len(), 7);
    }

    #[test]
    fn test_weekly_generation_steps_seven_days() {
        let generator = DemoDataGenerator::for_module(&module("test_interpretation")).unwrap();
        let range = DateRange::try_new(date("2024-01-01"), date("2024-01-20")).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let set = generator.generate(&range, Granularity::Week, GenerationMode::Static, &mut rng);

        assert_eq!(
            set.dates(),
            vec![date("2024-01-01"), date("2024-01-08"), date("2024-01-15")]
        );
    }

    #[test]
    fn test_random_values_respect_ranges() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let value = RandomRange::Integer { min: 60, max: 95 }.sample(&mut rng);
            assert!((60.0..=95.0).contains(&value));
            assert_eq!(value.fract(), 0.0);

            let pct = RandomRange::Percentage.sample(&mut rng);
            assert!((0.0..=100.0).contains(&pct));
            assert_eq!(round_ratio(pct), pct);
        }
    }
}
