use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct QviScale {
    pub min: f64,
    pub max: f64,
    pub baseline: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QviConfidence {
    pub method: &'static str,
    pub level: f64,
    pub min_sample: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityValueIndex {
    pub current: f64,
    pub delta_7d: f64,
    pub rank_local: u32,
    pub scale: QviScale,
    pub confidence: QviConfidence,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentTopic {
    pub topic: &'static str,
    pub positive: u8,
    pub negative: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceHistogram {
    pub bins: Vec<&'static str>,
    pub your_restaurant: Vec<u32>,
    pub competitors: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    pub qvi: QualityValueIndex,
    pub sentiment_topics: Vec<SentimentTopic>,
    pub price_histogram: PriceHistogram,
}

#[derive(Debug, Clone, Serialize)]
pub struct Competitor {
    pub name: &'static str,
    pub price_index: f64,
    pub quality_index: f64,
    pub review_volume: u32,
    pub segment: &'static str,
    #[serde(rename = "self", skip_serializing_if = "std::ops::Not::not")]
    pub is_self: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedCompetitor {
    pub rank: u32,
    pub name: &'static str,
    pub qvi: f64,
    pub delta_7d: f64,
    pub price_index: f64,
    pub opp: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credits {
    pub available: u32,
    pub rollover_max: u32,
    pub earned_this_month: u32,
    pub expires_next: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Billing {
    pub credits: Credits,
}

#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub ts: &'static str,
    pub msg: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Alerts {
    pub latest: Vec<Alert>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    pub menu_top3: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportJob {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub tier: &'static str,
    pub status: &'static str,
    pub eta: &'static str,
    pub cost_est: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Jobs {
    pub reports: Vec<ReportJob>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostModel {
    pub llm_per_report: f64,
    pub proxy_gb_per_report: f64,
    pub cache_hit_rate: f64,
}

pub fn analytics() -> Analytics {
    Analytics {
        qvi: QualityValueIndex {
            current: 58.7,
            delta_7d: 1.6,
            rank_local: 3,
            scale: QviScale {
                min: 0.0,
                max: 100.0,
                baseline: 50.0,
            },
            confidence: QviConfidence {
                method: "bootstrap_ci",
                level: 0.95,
                min_sample: 100,
            },
        },
        sentiment_topics: vec![
            topic("Food Quality", 78),
            topic("Service", 65),
            topic("Atmosphere", 82),
            topic("Value", 58),
            topic("Speed", 71),
        ],
        price_histogram: PriceHistogram {
            bins: vec!["$8-12", "$12-16", "$16-20", "$20-24", "$24+"],
            your_restaurant: vec![5, 12, 8, 3, 2],
            competitors: vec![8, 15, 12, 6, 4],
        },
    }
}

fn topic(topic: &'static str, positive: u8) -> SentimentTopic {
    SentimentTopic {
        topic,
        positive,
        negative: 100 - positive,
    }
}

pub fn competitors() -> Vec<Competitor> {
    vec![
        competitor("Pasta House", 0.92, 1.05, 580, "Italian"),
        competitor("Burger Barn", 0.88, 0.98, 420, "Burgers"),
        competitor("Sushi Go", 1.15, 1.12, 640, "Sushi"),
        Competitor {
            is_self: true,
            ..competitor("Your Venue", 1.0, 1.08, 500, "Self")
        },
    ]
}

fn competitor(
    name: &'static str,
    price_index: f64,
    quality_index: f64,
    review_volume: u32,
    segment: &'static str,
) -> Competitor {
    Competitor {
        name,
        price_index,
        quality_index,
        review_volume,
        segment,
        is_self: false,
    }
}

/// Competitor QVI ranking, best first.
pub fn qvi_ranking() -> Vec<RankedCompetitor> {
    let mut ranked: Vec<(&str, f64, f64, f64, &str)> = vec![
        ("Pasta House", 61.9, 1.1, 0.92, "Raise pasta mains +$1"),
        ("Burger Barn", 52.3, -0.4, 0.88, "Upsell shakes"),
        ("Sushi Go", 64.1, 2.3, 1.15, "Lower lunch combos"),
        ("Your Venue", 58.7, 1.6, 1.0, "Bundle sides Tue-Thu"),
    ];
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .zip(1..)
        .map(
            |((name, qvi, delta_7d, price_index, opp), rank)| RankedCompetitor {
                rank,
                name,
                qvi,
                delta_7d,
                price_index,
                opp,
            },
        )
        .collect()
}

pub fn billing() -> Billing {
    Billing {
        credits: Credits {
            available: 3,
            rollover_max: 4,
            earned_this_month: 1,
            expires_next: "2025-11-01",
        },
    }
}

pub fn alerts() -> Alerts {
    Alerts {
        latest: vec![
            Alert {
                ts: "2025-08-22T06:05:00Z",
                msg: "Price increase detected at Sushi Go (+4 items)",
            },
            Alert {
                ts: "2025-08-21T19:40:00Z",
                msg: "Negative review spike for Burger Barn (3σ)",
            },
        ],
    }
}

pub fn recommendations() -> Recommendations {
    Recommendations {
        menu_top3: vec![
            "Raise flagship burger +$1 (elasticity low, QVI gain +1.2)",
            "Add seasonal pasta using local supplier deal (COGS -9%)",
            "Promote weekday bundle (app + drink) to lift lunch traffic",
        ],
    }
}

pub fn jobs() -> Jobs {
    Jobs {
        reports: vec![
            ReportJob {
                id: "R-1021",
                kind: "Monthly Pulse",
                tier: "Starter",
                status: "queued",
                eta: "02:15",
                cost_est: 12.4,
            },
            ReportJob {
                id: "R-1022",
                kind: "Deep-Dive",
                tier: "Growth",
                status: "running",
                eta: "09:50",
                cost_est: 23.1,
            },
        ],
    }
}

pub fn cost_model() -> CostModel {
    CostModel {
        llm_per_report: 0.18,
        proxy_gb_per_report: 0.12,
        cache_hit_rate: 0.67,
    }
}

pub fn slos() -> Vec<&'static str> {
    vec![
        "Dashboard freshness by 06:00 local",
        "Monthly report delivered by day 3",
    ]
}
