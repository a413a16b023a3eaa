//! 복합 신호 감지기.

use signal_core::domain::SignalEvidence;

use super::{DetectorContext, SignalDetector};

/// 여러 하위 감지기의 동의 여부로 신호를 만드는 감지기.
///
/// `require_all`이 켜지면 모든 하위 감지기가 같은 방향의 신호를
/// 내야 점수를 부여하고, 꺼지면 하나라도 내면 됩니다. 점수는 하위
/// 점수의 합이 아니라 이 감지기의 고정 가중치입니다.
pub struct CompositeDetector {
    name: String,
    weight: f64,
    require_all: bool,
    members: Vec<Box<dyn SignalDetector>>,
}

impl CompositeDetector {
    pub fn new(
        name: String,
        weight: f64,
        require_all: bool,
        members: Vec<Box<dyn SignalDetector>>,
    ) -> Self {
        Self {
            name,
            weight,
            require_all,
            members,
        }
    }
}

impl SignalDetector for CompositeDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect(&self, ctx: &DetectorContext<'_>) -> SignalEvidence {
        let mut evidence = SignalEvidence::new(self.name.clone(), 0.0, 0.0);
        if self.members.is_empty() {
            return evidence;
        }

        let mut buy_votes = 0usize;
        let mut sell_votes = 0usize;

        for member in &self.members {
            let member_evidence = member.detect(ctx);
            if member_evidence.buy_score > 0.0 {
                buy_votes += 1;
            }
            if member_evidence.sell_score > 0.0 {
                sell_votes += 1;
            }
            evidence.details.extend(member_evidence.details);
        }

        let buy_confirmed = if self.require_all {
            buy_votes == self.members.len()
        } else {
            buy_votes > 0
        };
        let sell_confirmed = if self.require_all {
            sell_votes == self.members.len()
        } else {
            sell_votes > 0
        };

        if buy_confirmed {
            evidence.buy_score = self.weight;
        }
        if sell_confirmed {
            evidence.sell_score = self.weight;
        }

        evidence
    }
}
