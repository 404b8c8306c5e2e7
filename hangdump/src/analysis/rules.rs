//! Catalogue of known hang signatures.
//!
//! Each rule looks for one literal marker in the frames of either the native
//! or the managed stacks. A few rules pull in extra threads from the rest of
//! the transcript; that is described by [`Correlation`].

use crate::domain::Section;
use serde::Serialize;

/// Stable identifier of a rule, used in exported findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    GcThreads,
    WaitingForGc,
    GcSuspendingThreads,
    FinalizerBlocked,
    MonitorTryEnter,
    MonitorContention,
    CriticalSection,
    WaitOne,
    WaitMultiple,
    SocketReceive,
    ComSendReceive,
    WaitingForSta,
}

/// Which stacks a rule scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackSource {
    Native,
    Managed,
}

/// Extra information a rule attaches once its marker matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correlation {
    None,
    /// Native threads running a collection ([`GC_TRIGGER_MARKER`]).
    TriggeringGc,
    /// Managed threads with preemptive GC disabled.
    PreemptiveGcDisabled,
    /// Finalizer thread from the thread table; the marker marks it idle.
    FinalizerThread,
}

/// One entry of the catalogue.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub id: RuleId,
    pub section: Section,
    pub source: StackSource,
    pub marker: &'static str,
    pub message: &'static str,
    pub tip: Option<&'static str>,
    pub correlation: Correlation,
}

/// Frame of the thread that started the collection others wait for.
pub const GC_TRIGGER_MARKER: &str = "GarbageCollectGeneration";

pub const GC_TRIGGER_MESSAGE: &str = "The GC was triggered by thread";
pub const GC_DISABLED_MESSAGE: &str =
    "The following threads can't be suspended because preemptive GC is disabled";
pub const FINALIZER_NOT_BLOCKED_MESSAGE: &str = "The finalizer thread is NOT blocked";

const SYNCBLK_TIP: &str = "Run !sieextPub.syncblk to find out who the owner is";
const CRITLIST_TIP: &str = "Run !sieextPub.critlist to find out who the owner is";
const COMCALLS_TIP: &str = "Run !sieextPub.comcalls to find out where the calls are going";

// =============================================================================
// CATALOGUE
// =============================================================================

/// All rules, in report order.
pub const CATALOGUE: &[Rule] = &[
    // GC
    Rule {
        id: RuleId::GcThreads,
        section: Section::Gc,
        source: StackSource::Native,
        marker: "gc_thread_stub",
        message: "The following threads are GC threads",
        tip: None,
        correlation: Correlation::None,
    },
    Rule {
        id: RuleId::WaitingForGc,
        section: Section::Gc,
        source: StackSource::Native,
        marker: "WaitUntilGCComplete",
        message: "The following threads are waiting for the GC to finish",
        tip: None,
        correlation: Correlation::TriggeringGc,
    },
    Rule {
        id: RuleId::GcSuspendingThreads,
        section: Section::Gc,
        source: StackSource::Native,
        marker: "SysSuspendForGC",
        message: "The GC is working on suspending threads to continue with garbage collection",
        tip: None,
        correlation: Correlation::PreemptiveGcDisabled,
    },
    Rule {
        id: RuleId::FinalizerBlocked,
        section: Section::Gc,
        source: StackSource::Native,
        marker: "WaitForFinalizerEvent",
        message: "The finalizer thread is blocked",
        tip: None,
        correlation: Correlation::FinalizerThread,
    },
    // Locks
    Rule {
        id: RuleId::MonitorTryEnter,
        section: Section::Locks,
        source: StackSource::Native,
        marker: "JIT_MonTryEnter",
        message: "The following threads are spinning waiting to enter a .NET lock",
        tip: None,
        correlation: Correlation::None,
    },
    Rule {
        id: RuleId::MonitorContention,
        section: Section::Locks,
        source: StackSource::Native,
        marker: "JITutil_MonContention",
        message: "The following threads are spinning waiting to enter a contended .NET lock",
        tip: Some(SYNCBLK_TIP),
        correlation: Correlation::None,
    },
    Rule {
        id: RuleId::CriticalSection,
        section: Section::Locks,
        source: StackSource::Native,
        marker: "EnterCriticalSection",
        message: "The following threads are waiting for a critical section",
        tip: Some(CRITLIST_TIP),
        correlation: Correlation::None,
    },
    Rule {
        id: RuleId::WaitOne,
        section: Section::Locks,
        source: StackSource::Managed,
        marker: "WaitOne",
        message: "The following threads are waiting in a WaitOne",
        tip: None,
        correlation: Correlation::None,
    },
    Rule {
        id: RuleId::WaitMultiple,
        section: Section::Locks,
        source: StackSource::Managed,
        marker: "WaitMultiple",
        message: "The following threads are waiting in a WaitMultiple",
        tip: None,
        correlation: Correlation::None,
    },
    // External
    Rule {
        id: RuleId::SocketReceive,
        section: Section::External,
        source: StackSource::Managed,
        marker: "Socket.Receive",
        message: "The following threads are waiting in a Socket.Receive",
        tip: None,
        correlation: Correlation::None,
    },
    Rule {
        id: RuleId::ComSendReceive,
        section: Section::External,
        source: StackSource::Native,
        marker: "SendReceive2",
        message: "The following threads are waiting in a SendReceive2 (COM call)",
        tip: Some(COMCALLS_TIP),
        correlation: Correlation::None,
    },
    Rule {
        id: RuleId::WaitingForSta,
        section: Section::External,
        source: StackSource::Native,
        marker: "GetToSTA",
        message: "The following threads are waiting in a GetToSTA (waiting for an STA thread)",
        tip: Some(COMCALLS_TIP),
        correlation: Correlation::None,
    },
];

/// Look up a rule by id.
#[must_use]
pub fn rule(id: RuleId) -> Option<&'static Rule> {
    CATALOGUE.iter().find(|rule| rule.id == id)
}
