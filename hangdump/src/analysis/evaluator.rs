//! Rule evaluation over a parsed transcript.
//!
//! # Architecture
//!
//! - **`threads_matching()`** - ids of every stack containing a marker
//! - **`RuleEvaluator`** - runs the [`CATALOGUE`] against one [`Transcript`]
//!
//! Rules never share state, so evaluating any subset in any order produces
//! the same per-rule findings.

use super::rules::{
    Correlation, Rule, RuleId, StackSource, CATALOGUE, FINALIZER_NOT_BLOCKED_MESSAGE,
    GC_DISABLED_MESSAGE, GC_TRIGGER_MARKER, GC_TRIGGER_MESSAGE,
};
use crate::domain::{Section, ThreadId};
use crate::transcript::{CallStack, Transcript};
use log::debug;
use serde::Serialize;

/// Secondary thread list attached to a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedThreads {
    pub message: &'static str,
    pub thread_ids: Vec<ThreadId>,
}

/// Diagnostic conclusion produced by one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub section: Section,
    pub rule: RuleId,
    pub message: &'static str,
    /// Matching threads, in transcript order. Never empty.
    pub thread_ids: Vec<ThreadId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<RelatedThreads>,
}

/// Ids of every stack with a frame containing `marker`, in input order.
#[must_use]
pub fn threads_matching(stacks: &[CallStack], marker: &str) -> Vec<ThreadId> {
    stacks.iter().filter(|stack| stack.matches(marker)).map(CallStack::id).collect()
}

/// Runs the rule catalogue against one transcript.
pub struct RuleEvaluator<'t> {
    transcript: &'t Transcript,
}

impl<'t> RuleEvaluator<'t> {
    #[must_use]
    pub fn new(transcript: &'t Transcript) -> Self {
        Self { transcript }
    }

    /// Evaluate every rule, returning findings in catalogue order.
    #[must_use]
    pub fn evaluate(&self) -> Vec<Finding> {
        self.evaluate_rules(CATALOGUE)
    }

    /// Evaluate a subset of rules, in the order given.
    #[must_use]
    pub fn evaluate_rules(&self, rules: &[Rule]) -> Vec<Finding> {
        rules.iter().filter_map(|rule| self.evaluate_rule(rule)).collect()
    }

    /// Evaluate a single rule. `None` means the rule found nothing to report.
    #[must_use]
    pub fn evaluate_rule(&self, rule: &Rule) -> Option<Finding> {
        if rule.correlation == Correlation::FinalizerThread {
            return self.evaluate_finalizer(rule);
        }

        let thread_ids = threads_matching(self.stacks(rule.source), rule.marker);
        debug!("{:?}: {} threads match {:?}", rule.id, thread_ids.len(), rule.marker);
        if thread_ids.is_empty() {
            return None;
        }

        let related = match rule.correlation {
            Correlation::TriggeringGc => related(
                GC_TRIGGER_MESSAGE,
                threads_matching(&self.transcript.native_stacks, GC_TRIGGER_MARKER),
            ),
            Correlation::PreemptiveGcDisabled => {
                related(GC_DISABLED_MESSAGE, self.gc_disabled_threads())
            }
            Correlation::None | Correlation::FinalizerThread => None,
        };

        Some(Finding {
            section: rule.section,
            rule: rule.id,
            message: rule.message,
            thread_ids,
            tip: rule.tip,
            related,
        })
    }

    /// First thread flagged as the finalizer in the managed thread table.
    #[must_use]
    pub fn finalizer_thread(&self) -> Option<ThreadId> {
        self.transcript
            .dotnet_threads
            .iter()
            .find(|thread| thread.is_finalizer_thread)
            .map(|thread| thread.id)
    }

    /// Managed threads that have preemptive GC disabled.
    #[must_use]
    pub fn gc_disabled_threads(&self) -> Vec<ThreadId> {
        self.transcript
            .dotnet_threads
            .iter()
            .filter(|thread| !thread.gc_enabled)
            .map(|thread| thread.id)
            .collect()
    }

    fn stacks(&self, source: StackSource) -> &'t [CallStack] {
        let transcript: &'t Transcript = self.transcript;
        match source {
            StackSource::Native => &transcript.native_stacks,
            StackSource::Managed => &transcript.dotnet_stacks,
        }
    }

    /// The finalizer verdict is always reported once the transcript holds
    /// any thread. Without a flagged finalizer the marker is checked on every
    /// native stack and the id is reported as unknown.
    fn evaluate_finalizer(&self, rule: &Rule) -> Option<Finding> {
        if self.transcript.is_empty() {
            return None;
        }

        let native = self.stacks(rule.source);
        let finalizer = self.finalizer_thread();
        let idle = match finalizer {
            Some(id) => native.iter().any(|stack| stack.id() == id && stack.matches(rule.marker)),
            None => native.iter().any(|stack| stack.matches(rule.marker)),
        };
        let id = finalizer.unwrap_or(ThreadId::UNKNOWN);
        debug!("{:?}: finalizer thread {id}, idle: {idle}", rule.id);

        Some(Finding {
            section: rule.section,
            rule: rule.id,
            message: if idle { FINALIZER_NOT_BLOCKED_MESSAGE } else { rule.message },
            thread_ids: vec![id],
            tip: rule.tip,
            related: None,
        })
    }
}

fn related(message: &'static str, thread_ids: Vec<ThreadId>) -> Option<RelatedThreads> {
    (!thread_ids.is_empty()).then_some(RelatedThreads { message, thread_ids })
}
