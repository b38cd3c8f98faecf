//! Rule-based intent classifier: ordered pattern table, first match wins.
//!
//! Intents are evaluated in declaration order and, within an intent, patterns
//! in order. The first pattern that matches decides the intent. There is no
//! scoring: a question that matches both `work_location` and `team` is always
//! `work_location` because that row comes first. The table order is part of
//! the observable behaviour and must not be rearranged.

use std::sync::LazyLock;

use regex::Regex;

use crate::intent::Intent;

/// Bare replies to "will you work remotely or on-site?". Checked against the
/// trimmed question before the ordered table so that a one-word "remote" is a
/// reply rather than a `work_location` question.
const REPLY_PATTERNS: &[&str] = &[
    r"^remote$",
    r"^remotely$",
    r"^onsite$",
    r"^on-site$",
    r"^on site$",
    r"^office$",
];

const RULE_TABLE: &[(Intent, &[&str])] = &[
    (
        Intent::Salary,
        &[
            r"what.*salary",
            r"how much.*make",
            r"how much.*paid",
            r"my.*salary",
            r"salary.*is",
        ],
    ),
    (
        Intent::DaysOff,
        &[
            r"days off",
            r"vacation.*left",
            r"vacation.*remaining",
            r"time off",
            r"pto",
            r"leave.*remaining",
        ],
    ),
    (
        Intent::Bonus,
        &[r"bonus", r"what.*bonus", r"bonus percentage", r"bonus %"],
    ),
    (
        Intent::WorkLocation,
        &[
            r"work.*person",
            r"on-site",
            r"onsite",
            r"remote",
            r"work.*office",
            r"where.*work",
            r"what.*town",
            r"which.*town",
            r"my.*town",
            r"what.*city",
            r"which.*city",
            r"my.*city",
            r"where.*located",
            r"my.*location",
            r"where.*live",
            r"where.*i.*live",
            r"my.*home",
            r"home.*town",
            r"home.*city",
            r"based.*in",
            r"living.*in",
        ],
    ),
    (
        Intent::Team,
        &[r"what.*team", r"which.*team", r"my.*team"],
    ),
    (
        Intent::Manager,
        &[r"senior management", r"manager", r"who.*manager"],
    ),
    (
        Intent::StartDate,
        &[r"start date", r"when.*start", r"hire date", r"joined"],
    ),
    (
        Intent::ScheduleCall,
        &[
            r"schedule.*call",
            r"book.*call",
            r"set.*up.*call",
            r"schedule.*meeting",
            r"book.*meeting",
            r"set.*up.*meeting",
            r"arrange.*call",
            r"arrange.*meeting",
            r"calendar",
            r"appointment",
            r"book.*time",
            r"schedule.*time",
            r"when.*available",
            r"availability",
            r"when.*can.*meet",
            r"when.*can.*talk",
            r"when.*can.*call",
            r"when.*free",
            r"free.*time",
            r"available.*time",
            r"set.*call",
            r"setup.*call",
            r"talk.*to.*hr",
            r"speak.*with.*hr",
            r"meet.*with.*hr",
            r"hr.*available",
            r"hr.*availability",
            r"available.*slot",
            r"free.*slot",
            r"time.*slot",
        ],
    ),
    (
        Intent::EmailHrRequest,
        &[
            r"can.*i.*take",
            r"is.*there.*way",
            r"how.*can.*i.*get",
            r"need.*to.*request",
            r"want.*to.*request",
            r"need.*help.*with",
            r"need.*assistance",
            r"request.*for",
            r"apply.*for",
            r"extra.*day",
            r"more.*days.*off",
            r"additional.*pto",
            r"exception.*to",
            r"special.*request",
            r"can.*you.*help.*me",
            r"is.*it.*possible",
            r"would.*it.*be.*possible",
        ],
    ),
    (
        Intent::HealthInsurance,
        &[
            r"health.*insurance",
            r"medical.*insurance",
            r"health.*plan",
            r"insurance.*option",
            r"health.*benefit",
            r"medical.*plan",
            r"health.*coverage",
            r"insurance.*cost",
            r"health.*care",
            r"medical.*benefit",
            r"hmo",
            r"ppo",
            r"hdhp",
            r"deductible",
            r"premium",
        ],
    ),
    (
        Intent::RemoteResponse,
        &[
            r"^remote$",
            r"^remotely$",
            r"^remote work",
            r"^work.*remote",
            r"i.*ll.*remote",
            r"i.*ll.*work.*remote",
            r"^onsite$",
            r"^on-site$",
            r"^on site$",
            r"^office$",
            r"i.*ll.*onsite",
            r"i.*ll.*office",
            r"at.*office",
            r"in.*office",
        ],
    ),
    (
        Intent::W2,
        &[
            r"w-?2",
            r"tax.*form",
            r"tax.*document",
            r"wage.*statement",
            r"tax.*statement",
        ],
    ),
    (
        Intent::UpdateAddress,
        &[
            r"change.*address",
            r"update.*address",
            r"new address",
            r"move.*to",
        ],
    ),
    (
        Intent::UpdateInfo,
        &[
            r"change.*my",
            r"update.*my",
            r"modify.*my",
            r"edit.*my",
            r"mov(?:e|ed|ing)\s+to",
            r"relocated\s+to",
            r"transferred\s+to",
            r"promoted",
            r"reassigned",
            r"update.*that.*to",
            r"change.*that.*to",
            r"update.*it.*to",
            r"change.*it.*to",
            r"set.*to",
            r"make.*it",
        ],
    ),
];

struct IntentRule {
    intent: Intent,
    patterns: Vec<(&'static str, Regex)>,
}

static RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    RULE_TABLE
        .iter()
        .map(|(intent, patterns)| IntentRule {
            intent: *intent,
            patterns: patterns
                .iter()
                .map(|p| (*p, Regex::new(p).unwrap()))
                .collect(),
        })
        .collect()
});

static REPLIES: LazyLock<Vec<Regex>> =
    LazyLock::new(|| REPLY_PATTERNS.iter().map(|p| Regex::new(p).unwrap()).collect());

/// Deterministic question → intent mapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, question: &str) -> Intent {
        classify(question)
    }
}

/// Classify a question. Returns [`Intent::Unknown`] when nothing matches.
pub fn classify(question: &str) -> Intent {
    match matching_rule(question) {
        Some((intent, pattern)) => {
            tracing::debug!(intent = %intent, pattern, "intent matched");
            intent
        }
        None => {
            tracing::debug!("no intent pattern matched");
            Intent::Unknown
        }
    }
}

/// The intent and the pattern that decided it, if any.
pub fn matching_rule(question: &str) -> Option<(Intent, &'static str)> {
    let lower = question.to_lowercase();

    let reply = lower.trim().trim_end_matches(['.', '!', '?']).trim_end();
    if let Some(i) = REPLIES.iter().position(|re| re.is_match(reply)) {
        return Some((Intent::RemoteResponse, REPLY_PATTERNS[i]));
    }

    RULES.iter().find_map(|rule| {
        rule.patterns
            .iter()
            .find(|(_, re)| re.is_match(&lower))
            .map(|(pattern, _)| (rule.intent, *pattern))
    })
}
