#![allow(dead_code)]

use async_trait::async_trait;
use dpdpa_core::checklist::{ChecklistRegistry, SectionId};
use dpdpa_core::error::{CoreError, CoreResult, OracleFailureCategory};
use dpdpa_core::oracle::{EvaluationRequest, OracleClient};
use dpdpa_core::run::{RetryPolicy, RunInput, RunOptions};
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const POLICY: &str = "We collect your name and email to provide the service. \
You may withdraw consent at any time by writing to privacy@example.com.";
pub const CHAPTER: &str = "CHAPTER II OBLIGATIONS OF DATA FIDUCIARY. 4. Grounds for processing personal data.";

pub fn input() -> RunInput {
    RunInput::new(POLICY, CHAPTER).unwrap()
}

pub fn item_count(section: SectionId) -> usize {
    ChecklistRegistry::builtin().section(section).unwrap().len()
}

/// A well-formed oracle record with one item entry per flag in `matched`.
pub fn oracle_json(section: SectionId, matched: &[bool]) -> String {
    let items: Vec<_> = matched
        .iter()
        .enumerate()
        .map(|(idx, m)| {
            json!({
                "Item": format!("Obligation {}", idx + 1),
                "Matched": m,
                "Matched Sentences": if *m { vec![format!("Policy sentence {}.", idx + 1)] } else { vec![] },
                "Justification": if *m { "Explicitly covered." } else { "Not mentioned in the policy." },
            })
        })
        .collect();
    let unmatched = matched.iter().filter(|m| !**m).count();
    let rewrite: Vec<String> = (0..unmatched)
        .map(|n| format!("We will address missing obligation {}.", n + 1))
        .collect();
    json!({
        "DPDPA Section": section.label(),
        "DPDPA Section Meaning": format!("{} explained simply.", section.title()),
        "Checklist Items": items,
        // Deliberately wrong; the scorer recomputes these.
        "Match Level": "Fully Compliant",
        "Severity": "None",
        "Compliance Points": 1.0,
        "Suggested Rewrite": rewrite.join(" "),
    })
    .to_string()
}

pub fn all_matched(section: SectionId) -> String {
    oracle_json(section, &vec![true; item_count(section)])
}

pub fn none_matched(section: SectionId) -> String {
    oracle_json(section, &vec![false; item_count(section)])
}

/// First `unmatched` items unmatched, the rest matched.
pub fn partially_matched(section: SectionId, unmatched: usize) -> String {
    let flags: Vec<bool> = (0..item_count(section)).map(|i| i >= unmatched).collect();
    oracle_json(section, &flags)
}

#[derive(Debug, Clone)]
pub enum Script {
    Reply(String),
    DelayedReply(Duration, String),
    Fail(OracleFailureCategory),
}

/// Oracle fake answering from per-section scripts. The last script of a
/// section is reused once the queue is down to one entry.
pub struct ScriptedOracle {
    scripts: Mutex<HashMap<SectionId, VecDeque<Script>>>,
    calls: Mutex<HashMap<SectionId, usize>>,
    requests: Mutex<Vec<EvaluationRequest>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Every section answers fully compliant.
    pub fn all_compliant() -> Self {
        let oracle = Self::new();
        for section in SectionId::ALL {
            oracle.push(section, Script::Reply(all_matched(section)));
        }
        oracle
    }

    pub fn push(&self, section: SectionId, script: Script) -> &Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(section)
            .or_default()
            .push_back(script);
        self
    }

    /// Replaces whatever is scripted for `section`.
    pub fn set(&self, section: SectionId, script: Script) -> &Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(section, VecDeque::from([script]));
        self
    }

    pub fn calls(&self, section: SectionId) -> usize {
        self.calls.lock().unwrap().get(&section).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn requests(&self) -> Vec<EvaluationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn next_script(&self, section: SectionId) -> Option<Script> {
        let mut scripts = self.scripts.lock().unwrap();
        let queue = scripts.get_mut(&section)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl OracleClient for ScriptedOracle {
    fn model_id(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &EvaluationRequest) -> CoreResult<String> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(request.section_id)
            .or_default() += 1;
        self.requests.lock().unwrap().push(request.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let out = match self.next_script(request.section_id) {
            Some(Script::Reply(raw)) => {
                tokio::task::yield_now().await;
                Ok(raw)
            }
            Some(Script::DelayedReply(delay, raw)) => {
                tokio::time::sleep(delay).await;
                Ok(raw)
            }
            Some(Script::Fail(category)) => {
                Err(CoreError::transport(category, format!("scripted {}", category.as_str())))
            }
            None => Err(CoreError::transport(
                OracleFailureCategory::Rejected,
                format!("nothing scripted for {}", request.section_id),
            )),
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        out
    }
}

pub fn fast_options(max_in_flight: usize) -> RunOptions {
    RunOptions {
        max_in_flight,
        retry: RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
        },
        section_timeout: None,
    }
}
