//! Flow store — carries the job description and resumes between screens.
//!
//! One `Flow` per visitor, keyed by the id stored in the visitor's cookie
//! session. The flow also caches the ranked batch computed for its current
//! inputs; any change to the inputs drops the batch and revokes its links.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::MissingInput;
use crate::models::upload::UploadedFile;
use crate::ranking::ranker::{rank, RankedResult};
use crate::ranking::scorer::ResumeScorer;
use crate::ranking::{score_batch, ScoredResume};
use crate::session::links::LinkRegistry;

pub type FlowId = Uuid;

pub type RankedBatch = Vec<RankedResult<ScoredResume>>;

struct Flow {
    job_description: Option<UploadedFile>,
    resumes: Vec<UploadedFile>,
    batch: Option<RankedBatch>,
    touched: Instant,
}

impl Flow {
    fn new() -> Self {
        Self {
            job_description: None,
            resumes: Vec::new(),
            batch: None,
            touched: Instant::now(),
        }
    }
}

/// Names of what a flow currently carries, for rendering upload screens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowSnapshot {
    pub job_description: Option<String>,
    pub resumes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Results {
    /// Nothing to rank: no resumes (or no job description) carried.
    Empty,
    Ranked(RankedBatch),
}

#[derive(Default)]
pub struct FlowStore {
    flows: Mutex<HashMap<FlowId, Flow>>,
    links: LinkRegistry,
}

impl FlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn links(&self) -> &LinkRegistry {
        &self.links
    }

    /// Discards whatever the flow carried and starts it over empty.
    pub fn start(&self, flow_id: FlowId) {
        let mut flows = self.flows.lock();
        if let Some(mut previous) = flows.insert(flow_id, Flow::new()) {
            self.invalidate(&mut previous);
            debug!(%flow_id, "Restarted flow");
        } else {
            debug!(%flow_id, "Started flow");
        }
    }

    /// Replaces the job description and drops any resumes picked for the
    /// previous one.
    pub fn set_job_description(&self, flow_id: FlowId, file: UploadedFile) {
        let mut flows = self.flows.lock();
        let flow = flows.entry(flow_id).or_insert_with(Flow::new);
        self.invalidate(flow);
        info!(%flow_id, name = %file.name, bytes = file.size(), "Job description received");
        flow.job_description = Some(file);
        // Resumes are picked again for every job description
        flow.resumes.clear();
        flow.touched = Instant::now();
    }

    /// Replaces the resume list. Refused when the list is empty or the flow
    /// has no job description yet; a refusal never creates a flow.
    pub fn set_resumes(
        &self,
        flow_id: FlowId,
        files: Vec<UploadedFile>,
    ) -> Result<usize, MissingInput> {
        let mut flows = self.flows.lock();
        let Some(flow) = flows.get_mut(&flow_id) else {
            return Err(MissingInput::Resumes);
        };
        flow.touched = Instant::now();
        if files.is_empty() || flow.job_description.is_none() {
            return Err(MissingInput::Resumes);
        }
        self.invalidate(flow);
        let count = files.len();
        info!(%flow_id, count, "Resumes received");
        flow.resumes = files;
        Ok(count)
    }

    pub fn snapshot(&self, flow_id: FlowId) -> FlowSnapshot {
        let mut flows = self.flows.lock();
        match flows.get_mut(&flow_id) {
            Some(flow) => {
                flow.touched = Instant::now();
                FlowSnapshot {
                    job_description: flow.job_description.as_ref().map(|f| f.name.clone()),
                    resumes: flow.resumes.iter().map(|f| f.name.clone()).collect(),
                }
            }
            None => FlowSnapshot::default(),
        }
    }

    /// Ranked results for the flow's current inputs. The batch is computed on
    /// first request and reused until the inputs change; a new batch issues a
    /// fresh link for every resume.
    pub fn results(&self, flow_id: FlowId, scorer: &dyn ResumeScorer) -> Results {
        let mut flows = self.flows.lock();
        let Some(flow) = flows.get_mut(&flow_id) else {
            return Results::Empty;
        };
        flow.touched = Instant::now();

        if let Some(batch) = &flow.batch {
            return Results::Ranked(batch.clone());
        }

        let ranked = match (&flow.job_description, flow.resumes.is_empty()) {
            (Some(jd), false) => {
                let mut scored = score_batch(scorer, jd, &flow.resumes);
                for (entry, resume) in scored.iter_mut().zip(&flow.resumes) {
                    entry.link = Some(self.links.issue(&resume.name, resume.content.clone()));
                }
                rank(scored)
            }
            _ => return Results::Empty,
        };

        info!(
            %flow_id,
            resumes = ranked.len(),
            top_score = ranked.first().map(|r| r.item.assessment.score),
            scorer = scorer.backend(),
            "Computed ranking batch"
        );
        flow.batch = Some(ranked.clone());
        Results::Ranked(ranked)
    }

    /// Drops flows idle for longer than `max_idle`, revoking their links.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        self.evict_idle_at(Instant::now(), max_idle)
    }

    fn evict_idle_at(&self, now: Instant, max_idle: Duration) -> usize {
        let mut flows = self.flows.lock();
        let expired: Vec<FlowId> = flows
            .iter()
            .filter(|(_, flow)| now.saturating_duration_since(flow.touched) > max_idle)
            .map(|(id, _)| *id)
            .collect();
        for id in &expired {
            if let Some(mut flow) = flows.remove(id) {
                self.invalidate(&mut flow);
            }
        }
        if !expired.is_empty() {
            info!(evicted = expired.len(), remaining = flows.len(), "Evicted idle flows");
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.flows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn invalidate(&self, flow: &mut Flow) {
        if let Some(batch) = flow.batch.take() {
            self.links
                .revoke(batch.iter().filter_map(|r| r.item.link.as_ref()));
        }
    }
}
