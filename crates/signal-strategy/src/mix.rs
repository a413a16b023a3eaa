//! 전략 조합 (Strategy Mix).
//!
//! 여러 전략의 결과를 합성해 신호의 신뢰도와 일관성을 높입니다.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::StrategyKind;
use crate::error::{StrategyError, StrategyResult};
use crate::strategy::StrategyAssessment;

/// 조합 기본 임계값. 조합별 조정 계수가 곱해집니다.
pub const MIX_BASE_THRESHOLD: f64 = 8.0;

/// 전략 결과 합성 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixMode {
    /// 가중 평균
    Weighted,
    /// 과반수 투표
    Voting,
    /// 고신뢰도 전략만의 가중 평균
    Ensemble,
}

impl fmt::Display for MixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Weighted => "weighted",
            Self::Voting => "voting",
            Self::Ensemble => "ensemble",
        };
        write!(f, "{}", s)
    }
}

/// 전략 조합 정의.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyMixConfig {
    /// 조합 이름
    pub name: String,
    /// 설명
    pub description: String,
    /// 합성 방식
    pub mode: MixMode,
    /// (전략, 가중치) 목록
    pub members: Vec<(StrategyKind, f64)>,
    /// 임계값 조정 계수
    pub threshold_adjustment: f64,
}

impl StrategyMixConfig {
    /// 조합의 실효 임계값.
    pub fn effective_threshold(&self) -> f64 {
        self.threshold_adjustment * MIX_BASE_THRESHOLD
    }
}

/// 이름으로 기본 제공 조합을 조회합니다.
pub fn mix_config(name: &str) -> StrategyResult<StrategyMixConfig> {
    match name.trim().to_lowercase().as_str() {
        "balanced_mix" => Ok(StrategyMixConfig {
            name: "balanced_mix".to_string(),
            description: "균형, 모멘텀, 추세추종 전략을 조합하여 다양한 시장 상황에 대응"
                .to_string(),
            mode: MixMode::Weighted,
            members: vec![
                (StrategyKind::Balanced, 0.4),
                (StrategyKind::Momentum, 0.3),
                (StrategyKind::TrendFollowing, 0.3),
            ],
            threshold_adjustment: 0.9,
        }),
        "conservative_mix" => Ok(StrategyMixConfig {
            name: "conservative_mix".to_string(),
            description: "보수적, 고신뢰도, 스윙 전략을 조합하여 안정적인 신호 생성".to_string(),
            mode: MixMode::Voting,
            members: vec![
                (StrategyKind::Conservative, 1.0),
                (StrategyKind::QualityTrend, 1.0),
                (StrategyKind::Swing, 1.0),
            ],
            threshold_adjustment: 1.2,
        }),
        "aggressive_mix" => Ok(StrategyMixConfig {
            name: "aggressive_mix".to_string(),
            description: "공격적, 스캘핑, 변동성돌파 전략을 조합하여 빠른 기회 포착".to_string(),
            mode: MixMode::Weighted,
            members: vec![
                (StrategyKind::Aggressive, 0.4),
                (StrategyKind::Scalping, 0.3),
                (StrategyKind::VolatilityBreakout, 0.3),
            ],
            threshold_adjustment: 0.8,
        }),
        other => Err(StrategyError::UnknownMix(other.to_string())),
    }
}

/// 기본 제공 조합 이름 목록.
pub fn available_mixes() -> [&'static str; 3] {
    ["balanced_mix", "conservative_mix", "aggressive_mix"]
}

/// 개별 전략 결과들을 조합 설정에 따라 합성합니다.
pub fn combine(
    config: &StrategyMixConfig,
    results: &[(StrategyAssessment, f64)],
) -> StrategyResult<StrategyAssessment> {
    if results.is_empty() {
        return Err(StrategyError::InvalidConfig(
            "조합할 전략 결과가 없습니다".to_string(),
        ));
    }

    match config.mode {
        MixMode::Weighted => Ok(weighted_combination(config, results)),
        MixMode::Voting => Ok(voting_combination(results)),
        MixMode::Ensemble => Ok(ensemble_combination(config, results)),
    }
}

/// 가중 평균 합성.
fn weighted_combination(
    config: &StrategyMixConfig,
    results: &[(StrategyAssessment, f64)],
) -> StrategyAssessment {
    let mut total_score = 0.0;
    let mut total_buy = 0.0;
    let mut total_sell = 0.0;
    let mut total_confidence = 0.0;
    let mut total_weight = 0.0;
    let mut details = Vec::new();
    let mut names = Vec::new();

    for (result, weight) in results {
        total_score += result.total_score * weight;
        total_buy += result.buy_score * weight;
        total_sell += result.sell_score * weight;
        total_confidence += result.confidence * weight;
        total_weight += weight;
        details.extend(result.details.iter().cloned());
        names.push(format!("{}({weight:.1})", result.strategy_name));
    }

    let final_score = if total_weight > 0.0 {
        total_score / total_weight
    } else {
        0.0
    };
    let final_confidence = if total_weight > 0.0 {
        total_confidence / total_weight
    } else {
        0.0
    };

    let threshold = config.effective_threshold();

    StrategyAssessment::new(
        format!("mix({})", names.join("+")),
        final_score >= threshold,
        final_score,
        if total_weight > 0.0 { total_buy / total_weight } else { 0.0 },
        if total_weight > 0.0 { total_sell / total_weight } else { 0.0 },
        details,
        None,
    )
    .with_confidence(final_confidence)
}

/// 과반수 투표 합성.
///
/// 과반수가 신호를 냈을 때만 신호로 인정하고, 대표 결과는 최고
/// 점수 전략의 것입니다.
fn voting_combination(results: &[(StrategyAssessment, f64)]) -> StrategyAssessment {
    let total = results.len();
    let votes = results.iter().filter(|(r, _)| r.has_signal).count();
    let majority = votes as f64 > total as f64 / 2.0;

    let best = results
        .iter()
        .map(|(r, _)| r)
        .max_by(|a, b| a.total_score.total_cmp(&b.total_score))
        .expect("비어 있지 않은 결과 목록");

    StrategyAssessment::new(
        format!("voting({votes}/{total})"),
        majority,
        best.total_score,
        best.buy_score,
        best.sell_score,
        best.details.clone(),
        if majority { best.signal.clone() } else { None },
    )
    .with_confidence(votes as f64 / total as f64)
}

/// 앙상블 합성: 신뢰도 0.7 초과 전략만의 가중 평균.
///
/// 고신뢰도 전략이 하나도 없으면 전체 가중 평균으로 대체합니다.
fn ensemble_combination(
    config: &StrategyMixConfig,
    results: &[(StrategyAssessment, f64)],
) -> StrategyAssessment {
    let high_confidence: Vec<(StrategyAssessment, f64)> = results
        .iter()
        .filter(|(r, _)| r.confidence > 0.7)
        .cloned()
        .collect();

    if high_confidence.is_empty() {
        weighted_combination(config, results)
    } else {
        weighted_combination(config, &high_confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(name: &str, score: f64, has_signal: bool) -> StrategyAssessment {
        StrategyAssessment::new(name, has_signal, score, score, 0.0, vec![], None)
    }

    #[test]
    fn test_mix_presets() {
        for name in available_mixes() {
            let config = mix_config(name).unwrap();
            assert_eq!(config.name, name);
            assert!(!config.members.is_empty());
        }
        assert!(mix_config("mystery_mix").is_err());
    }

    #[test]
    fn test_effective_threshold() {
        let config = mix_config("conservative_mix").unwrap();
        assert!((config.effective_threshold() - 9.6).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_combination_scores() {
        let config = mix_config("balanced_mix").unwrap();
        let results = vec![
            (assessment("balanced", 10.0, true), 0.4),
            (assessment("momentum", 5.0, false), 0.3),
            (assessment("trend_following", 8.0, true), 0.3),
        ];

        let combined = combine(&config, &results).unwrap();
        // (10*0.4 + 5*0.3 + 8*0.3) / 1.0 = 7.9
        assert!((combined.total_score - 7.9).abs() < 1e-9);
        // 임계값 0.9 * 8.0 = 7.2 이상이므로 신호
        assert!(combined.has_signal);
    }

    #[test]
    fn test_voting_requires_majority() {
        let config = mix_config("conservative_mix").unwrap();

        // 3개 중 1표: 부결
        let minority = vec![
            (assessment("conservative", 13.0, true), 1.0),
            (assessment("quality_trend", 4.0, false), 1.0),
            (assessment("swing", 3.0, false), 1.0),
        ];
        let combined = combine(&config, &minority).unwrap();
        assert!(!combined.has_signal);
        assert!((combined.confidence - 1.0 / 3.0).abs() < 1e-9);

        // 3개 중 2표: 가결, 최고 점수 전략이 대표
        let majority = vec![
            (assessment("conservative", 13.0, true), 1.0),
            (assessment("quality_trend", 11.0, true), 1.0),
            (assessment("swing", 3.0, false), 1.0),
        ];
        let combined = combine(&config, &majority).unwrap();
        assert!(combined.has_signal);
        assert_eq!(combined.total_score, 13.0);
    }

    #[test]
    fn test_ensemble_falls_back_to_weighted() {
        let mut config = mix_config("balanced_mix").unwrap();
        config.mode = MixMode::Ensemble;

        // 모두 저신뢰도(점수 낮음): 전체 가중 평균으로 대체
        let results = vec![
            (assessment("balanced", 4.0, false), 0.5),
            (assessment("momentum", 5.0, false), 0.5),
        ];
        let combined = combine(&config, &results).unwrap();
        assert!((combined.total_score - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_ensemble_filters_low_confidence() {
        let mut config = mix_config("balanced_mix").unwrap();
        config.mode = MixMode::Ensemble;

        // 점수 12 -> 신뢰도 0.8 (고신뢰도), 점수 3 -> 0.2 (제외)
        let results = vec![
            (assessment("balanced", 12.0, true), 0.5),
            (assessment("momentum", 3.0, false), 0.5),
        ];
        let combined = combine(&config, &results).unwrap();
        assert!((combined.total_score - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_combine_empty_results() {
        let config = mix_config("balanced_mix").unwrap();
        assert!(combine(&config, &[]).is_err());
    }
}
