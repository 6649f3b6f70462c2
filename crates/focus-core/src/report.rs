//! Observation reports produced when a focus session completes.
//!
//! The remote text service is an opaque async call supplied by the caller.
//! Any failure resolves to a canned entry from the local table, so
//! [`generate_report`] always yields a valid report.

use crate::error::ReportError;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::future::Future;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
}

impl Language {
    /// Unknown tags fall back to English.
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" | "zh-hans" => Language::Zh,
            _ => Language::En,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DurationBucket {
    /// Up to one minute.
    Micro,
    /// Up to 25 minutes.
    Short,
    /// Up to an hour.
    Medium,
    Long,
}

impl DurationBucket {
    pub fn from_minutes(minutes: f64) -> Self {
        if minutes <= 1.0 {
            DurationBucket::Micro
        } else if minutes <= 25.0 {
            DurationBucket::Short
        } else if minutes <= 60.0 {
            DurationBucket::Medium
        } else {
            DurationBucket::Long
        }
    }

    fn index(self) -> usize {
        match self {
            DurationBucket::Micro => 0,
            DurationBucket::Short => 1,
            DurationBucket::Medium => 2,
            DurationBucket::Long => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stability {
    Stable,
    Unstable,
    Critical,
    Collapsed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub dimension_code: String,
    pub environment: String,
    pub log: String,
    pub entropy: f32,
    pub stability: Stability,
}

impl ReportData {
    /// Reject unusable payloads and clamp entropy into [0, 1].
    pub fn validated(mut self) -> Result<Self, ReportError> {
        if self.dimension_code.trim().is_empty() {
            return Err(ReportError::Malformed("empty dimensionCode".into()));
        }
        if !self.entropy.is_finite() {
            return Err(ReportError::Malformed("non-finite entropy".into()));
        }
        self.entropy = self.entropy.clamp(0.0, 1.0);
        Ok(self)
    }
}

/// Decode a service response body.
pub fn parse_report_data(body: &str) -> Result<ReportData, ReportError> {
    let data: ReportData =
        serde_json::from_str(body).map_err(|e| ReportError::Malformed(e.to_string()))?;
    data.validated()
}

/// Body of the request sent to the report service.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub duration_minutes: f64,
    pub task_context: String,
    pub tier: u8,
    pub language: Language,
}

impl ReportRequest {
    pub fn to_json(&self) -> Result<String, ReportError> {
        serde_json::to_string(self).map_err(|e| ReportError::Malformed(e.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedReport {
    pub data: ReportData,
    pub is_system_generated: bool,
}

/// Archived record of one completed session. Immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationReport {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: f64,
    /// Session length in minutes.
    pub duration: f64,
    pub dimension_code: String,
    pub environment: String,
    pub log: String,
    pub entropy: f32,
    pub stability: Stability,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_system_generated: bool,
}

impl ObservationReport {
    pub fn new(id: impl Into<String>, timestamp: f64, duration: f64, report: GeneratedReport) -> Self {
        let GeneratedReport {
            data,
            is_system_generated,
        } = report;
        Self {
            id: id.into(),
            timestamp,
            duration,
            dimension_code: data.dimension_code,
            environment: data.environment,
            log: data.log,
            entropy: data.entropy,
            stability: data.stability,
            is_system_generated,
        }
    }
}

struct CannedEntry {
    dimension_code: &'static str,
    environment: &'static str,
    log: &'static str,
    entropy: f32,
    stability: Stability,
}

const fn entry(
    dimension_code: &'static str,
    environment: &'static str,
    log: &'static str,
    entropy: f32,
    stability: Stability,
) -> CannedEntry {
    CannedEntry {
        dimension_code,
        environment,
        log,
        entropy,
        stability,
    }
}

const FALLBACK_EN: [[CannedEntry; 3]; 4] = [
    [
        entry(
            "MC-001",
            "A pocket of static between two heartbeats.",
            "Contact lasted a single breath. The probe returned with nothing but a faint hum.",
            0.82,
            Stability::Collapsed,
        ),
        entry(
            "MC-017",
            "Flickering corridor of half-formed light.",
            "The gate opened and closed before the instruments settled. Readings inconclusive.",
            0.74,
            Stability::Critical,
        ),
        entry(
            "MC-042",
            "A thin membrane of frost over nothing.",
            "Observation window too brief. The dimension dissolved as soon as it was named.",
            0.9,
            Stability::Collapsed,
        ),
    ],
    [
        entry(
            "SH-208",
            "Shallow tide pools reflecting a violet sky.",
            "A short, steady drift. Small structures assembled themselves along the shoreline.",
            0.38,
            Stability::Unstable,
        ),
        entry(
            "SH-311",
            "A quiet orbital garden turning in low light.",
            "The signal held for the whole pass. Minor turbulence near the end of the window.",
            0.29,
            Stability::Stable,
        ),
        entry(
            "SH-407",
            "Drifting dust lanes lit by a distant pulsar.",
            "Focus anchored the field briefly. Patterns emerged, then thinned out.",
            0.45,
            Stability::Unstable,
        ),
    ],
    [
        entry(
            "MD-512",
            "Crystalline plains under a slow double sunrise.",
            "Sustained observation revealed layered geometry humming at a constant pitch.",
            0.18,
            Stability::Stable,
        ),
        entry(
            "MD-640",
            "A cathedral of ice suspended in a gas giant's rings.",
            "The structure answered every signal with a matching echo. Coherence remained high.",
            0.22,
            Stability::Stable,
        ),
        entry(
            "MD-733",
            "Deep ocean trench glowing with slow currents.",
            "Long exposure stabilised the field. A faint rhythm persisted beneath the noise.",
            0.31,
            Stability::Stable,
        ),
    ],
    [
        entry(
            "LG-901",
            "An ancient library of light folded into a nebula.",
            "Extended watch mapped entire archives. The dimension now recognises the observer.",
            0.08,
            Stability::Stable,
        ),
        entry(
            "LG-955",
            "A silent city orbiting a collapsed star.",
            "Hours of steady attention lit every window. Nothing moved, yet everything listened.",
            0.12,
            Stability::Stable,
        ),
        entry(
            "LG-999",
            "The edge of the map, where stars thin into fog.",
            "The long vigil held past the horizon. Entropy fell to a whisper.",
            0.05,
            Stability::Stable,
        ),
    ],
];

const FALLBACK_ZH: [[CannedEntry; 3]; 4] = [
    [
        entry(
            "MC-001",
            "两次心跳之间的一小片静电。",
            "接触只持续了一次呼吸。探测器只带回一阵微弱的嗡鸣。",
            0.82,
            Stability::Collapsed,
        ),
        entry(
            "MC-017",
            "闪烁的走廊，光尚未成形。",
            "门在仪器稳定之前就已关闭。读数无法判定。",
            0.74,
            Stability::Critical,
        ),
        entry(
            "MC-042",
            "覆在虚无之上的一层薄霜。",
            "观测窗口过短。这个维度在被命名的瞬间便已消散。",
            0.9,
            Stability::Collapsed,
        ),
    ],
    [
        entry(
            "SH-208",
            "倒映着紫色天空的浅潮池。",
            "一段短暂而平稳的漂流。海岸线上有细小的结构自行聚合。",
            0.38,
            Stability::Unstable,
        ),
        entry(
            "SH-311",
            "微光中缓缓旋转的轨道花园。",
            "信号在整个过程中保持稳定。窗口末尾出现轻微扰动。",
            0.29,
            Stability::Stable,
        ),
        entry(
            "SH-407",
            "被遥远脉冲星照亮的尘埃带。",
            "专注短暂地锚定了场域。图案浮现，随后渐渐稀薄。",
            0.45,
            Stability::Unstable,
        ),
    ],
    [
        entry(
            "MD-512",
            "缓慢双日出下的晶体平原。",
            "持续观测揭示出层叠的几何结构，以恒定音高低鸣。",
            0.18,
            Stability::Stable,
        ),
        entry(
            "MD-640",
            "悬浮于气态巨行星光环中的冰之殿堂。",
            "结构以相同的回声回应每一个信号。相干性始终很高。",
            0.22,
            Stability::Stable,
        ),
        entry(
            "MD-733",
            "泛着缓慢洋流微光的深海海沟。",
            "长时间曝光使场域趋于稳定。噪声之下一直有微弱的节律。",
            0.31,
            Stability::Stable,
        ),
    ],
    [
        entry(
            "LG-901",
            "折叠进星云里的一座古老光之图书馆。",
            "长时间守望绘制出完整的档案。这个维度已认得观测者。",
            0.08,
            Stability::Stable,
        ),
        entry(
            "LG-955",
            "环绕坍缩恒星运行的寂静之城。",
            "数小时的专注点亮了每一扇窗。一切静止，却都在聆听。",
            0.12,
            Stability::Stable,
        ),
        entry(
            "LG-999",
            "地图的边缘，星光在此淡成雾。",
            "漫长的守夜越过了地平线。熵降至低语。",
            0.05,
            Stability::Stable,
        ),
    ],
];

/// Pick one canned entry for the bucket and language.
pub fn fallback_report<R: Rng + ?Sized>(
    bucket: DurationBucket,
    language: Language,
    rng: &mut R,
) -> ReportData {
    let table = match language {
        Language::En => &FALLBACK_EN,
        Language::Zh => &FALLBACK_ZH,
    };
    let row = &table[bucket.index()];
    let e = &row[rng.gen_range(0..row.len())];
    ReportData {
        dimension_code: e.dimension_code.to_string(),
        environment: e.environment.to_string(),
        log: e.log.to_string(),
        entropy: e.entropy,
        stability: e.stability,
    }
}

/// Ask the remote service for a report, falling back to the local table on
/// any failure. Never returns an error.
pub async fn generate_report<F, Fut, R>(
    request: ReportRequest,
    fetch: F,
    rng: &mut R,
) -> GeneratedReport
where
    F: FnOnce(ReportRequest) -> Fut,
    Fut: Future<Output = Result<ReportData, ReportError>>,
    R: Rng + ?Sized,
{
    let bucket = DurationBucket::from_minutes(request.duration_minutes);
    let language = request.language;

    match fetch(request).await.and_then(ReportData::validated) {
        Ok(data) => GeneratedReport {
            data,
            is_system_generated: false,
        },
        Err(e) => {
            log::warn!("[report] service unavailable, using fallback: {}", e);
            GeneratedReport {
                data: fallback_report(bucket, language, rng),
                is_system_generated: true,
            }
        }
    }
}
