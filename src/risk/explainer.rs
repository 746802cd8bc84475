//! Human-readable explanations for risk points
//!
//! Contributing factors come from an ordered keyword table scanned over the
//! accident's free-text fields. Within a group the first matching rule wins,
//! and groups are evaluated in declaration order, so output is stable.

use serde::{Deserialize, Serialize};

use crate::models::{RiskDetails, RiskPoint};

pub const MAX_FACTORS: usize = 5;
pub const MAX_RECOMMENDATIONS: usize = 6;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    #[must_use]
    pub fn from_risk(risk: f64) -> Self {
        if risk >= 0.8 {
            Severity::Critical
        } else if risk >= 0.6 {
            Severity::High
        } else if risk >= 0.4 {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Label shown to drivers
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Severity::Low => "Baixo",
            Severity::Moderate => "Moderado",
            Severity::High => "Alto",
            Severity::Critical => "Crítico",
        }
    }

    fn tier_recommendations(self) -> &'static [&'static str] {
        match self {
            Severity::Critical => &[
                "Trecho crítico: se possível, escolha horários de menor movimento",
                "Revise freios, pneus e iluminação do veículo antes da viagem",
                "Evite trafegar neste trecho à noite ou sob chuva",
            ],
            Severity::High => &[
                "Atenção elevada: mantenha velocidade moderada em todo o trecho",
                "Evite ultrapassagens neste trecho",
            ],
            Severity::Moderate | Severity::Low => &[
                "Mantenha atenção constante à sinalização",
                "Planeje paradas e evite dirigir cansado",
            ],
        }
    }
}

/// Why a point is risky and what a driver can do about it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Explanation {
    pub severity: Severity,
    pub risk: f64,
    pub factors: Vec<String>,
    pub recommendations: Vec<String>,
}

/// One keyword rule: any keyword matching yields the factor and recommendation
struct KeywordRule {
    group: &'static str,
    keywords: &'static [&'static str],
    factor: &'static str,
    recommendation: &'static str,
}

const RULES: &[KeywordRule] = &[
    KeywordRule {
        group: "rollover",
        keywords: &["capotamento", "tombamento", "capotagem"],
        factor: "Histórico de capotamento ou tombamento",
        recommendation: "Reduza a velocidade nas curvas e evite manobras bruscas",
    },
    KeywordRule {
        group: "collision",
        keywords: &["colisão", "colisao", "abalroamento"],
        factor: "Colisões registradas no trecho",
        recommendation: "Mantenha distância segura do veículo à frente",
    },
    KeywordRule {
        group: "pedestrian",
        keywords: &["atropelamento", "pedestre"],
        factor: "Atropelamentos registrados no trecho",
        recommendation: "Atenção redobrada a pedestres e ciclistas, principalmente à noite",
    },
    KeywordRule {
        group: "speeding",
        keywords: &["velocidade"],
        factor: "Velocidade incompatível com a via",
        recommendation: "Respeite os limites de velocidade sinalizados",
    },
    KeywordRule {
        group: "fatigue",
        keywords: &["sono", "fadiga", "cansaço", "dormindo"],
        factor: "Fadiga ou sono do condutor",
        recommendation: "Faça pausas a cada duas horas de direção",
    },
    KeywordRule {
        group: "rain",
        keywords: &["chuva", "molhad", "garoa", "chuvisco"],
        factor: "Pista molhada ou chuva",
        recommendation: "Com chuva, reduza a velocidade e aumente a distância de seguimento",
    },
    KeywordRule {
        group: "maneuver",
        keywords: &["ultrapassagem", "manobra", "contramão"],
        factor: "Ultrapassagens ou manobras perigosas",
        recommendation: "Ultrapasse apenas em trechos permitidos e com boa visibilidade",
    },
    KeywordRule {
        group: "road",
        keywords: &["simples"],
        factor: "Pista simples, sem separação entre os sentidos",
        recommendation: "Cuidado com veículos no sentido contrário",
    },
    KeywordRule {
        group: "road",
        keywords: &["dupla", "múltipla", "multipla"],
        factor: "Pista dupla, com fluxo intenso e velocidades altas",
        recommendation: "Use a faixa da esquerda apenas para ultrapassar",
    },
];

const FATALITY_RECOMMENDATION: &str =
    "Trecho com histórico de acidentes fatais: redobre a atenção e reduza a velocidade";
const SEVERE_INJURY_RECOMMENDATION: &str =
    "Trecho com feridos graves: evite distrações ao volante";

/// Explains risk points. Pure; never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskExplainer;

impl RiskExplainer {
    #[must_use]
    pub fn explain(&self, point: &RiskPoint) -> Explanation {
        let severity = Severity::from_risk(point.risk);
        let mut factors = Vec::new();
        let mut recommendations = Vec::new();

        match &point.details {
            Some(details) => {
                casualty_factors(details, &mut factors, &mut recommendations);
                keyword_factors(details, &mut factors, &mut recommendations);
                if factors.is_empty() {
                    factors.push("Nenhum fator específico identificado no registro".to_string());
                }
            }
            None => {
                factors.push("Ponto de risco conhecido do trecho, sem dados detalhados".to_string());
            }
        }

        for recommendation in severity.tier_recommendations() {
            push_unique(&mut recommendations, recommendation);
        }

        factors.truncate(MAX_FACTORS);
        recommendations.truncate(MAX_RECOMMENDATIONS);

        Explanation {
            severity,
            risk: point.risk,
            factors,
            recommendations,
        }
    }
}

fn casualty_factors(
    details: &RiskDetails,
    factors: &mut Vec<String>,
    recommendations: &mut Vec<String>,
) {
    if details.fatalities > 0 {
        factors.push(match details.fatalities {
            1 => "Acidente com 1 vítima fatal".to_string(),
            n => format!("Acidente com {n} vítimas fatais"),
        });
        push_unique(recommendations, FATALITY_RECOMMENDATION);
    }
    if details.severe_injuries > 0 {
        factors.push(match details.severe_injuries {
            1 => "1 ferido grave".to_string(),
            n => format!("{n} feridos graves"),
        });
        push_unique(recommendations, SEVERE_INJURY_RECOMMENDATION);
    }
}

fn keyword_factors(
    details: &RiskDetails,
    factors: &mut Vec<String>,
    recommendations: &mut Vec<String>,
) {
    let haystack = details
        .text_fields()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" | ");

    let mut matched_groups: Vec<&str> = Vec::new();
    for rule in RULES {
        if matched_groups.contains(&rule.group) {
            continue;
        }
        if rule.keywords.iter().any(|keyword| haystack.contains(keyword)) {
            matched_groups.push(rule.group);
            factors.push(rule.factor.to_string());
            push_unique(recommendations, rule.recommendation);
        }
    }
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}
