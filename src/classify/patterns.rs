//! Default pattern tables for the regex classifier.
//!
//! Each group encodes lexical signals that a task suits a particular backend.
//! Patterns are compiled case-insensitively.

/// Pattern group for one backend.
pub struct PatternSet {
    /// Backend ID this group scores for
    pub backend_id: &'static str,
    /// Regular expressions, matched case-insensitively against the task text
    pub patterns: &'static [&'static str],
}

/// Signals that a task suits the local agent CLI: code and UI generation,
/// file manipulation, test writing.
const AGENT_CLI_PATTERNS: &[&str] = &[
    r"generate\b.*\b(ui|component|page|view|form|dashboard)",
    r"\b(react|vue|svelte|frontend)\b",
    r"\b(write|create|build|implement)\b.*\b(code|function|module|class|script|endpoint)",
    r"\brefactor\b",
    r"\b(fix|debug)\b.*\b(bug|test|error|crash)",
    r"write\b.*\btests?\b",
    r"\b(edit|update|modify)\b.*\bfiles?\b",
    r"\bscaffold\b",
];

/// Signals that a task needs the high-quality reasoning backend.
const REASONING_PATTERNS: &[&str] = &[
    r"security\s+(audit|review|analysis)",
    r"\barchitect(ure|ural)?\b",
    r"\bsystem\s+design\b",
    r"\b(complex|subtle|tricky|hard)\b",
    r"\bthreat\s+model",
    r"\broot[\s-]?cause\b",
    r"(review|critique)\b.*\b(design|proposal|plan|approach)",
    r"\btrade[\s-]?offs?\b",
];

/// Signals that a task is small enough for the low-latency backend.
const FAST_INFERENCE_PATTERNS: &[&str] = &[
    r"\bquick\s+(summary|answer|check|look)",
    r"\bsummari[sz]e\b",
    r"\bclassif(y|ication)\b",
    r"\bextract\b",
    r"\btranslate\b",
    r"\b(one[\s-]?liner|short\s+answer)\b",
    r"\bboilerplate\b",
    r"\btl;?dr\b",
];

/// Signals that a task depends on capabilities degraded in fallback mode:
/// session memory and outbound messaging. Tasks matching these are blocked
/// rather than rerouted while fallback is active.
pub const PRIMARY_CAPABILITY_PATTERNS: &[&str] = &[
    r"\bremember\b",
    r"\bmemor(y|ies)\b",
    r"\b(previous|earlier|last)\s+(session|conversation|run)\b",
    r"\bsend\b.*\b(message|email|alert|notification)",
    r"\bnotify\b",
    r"\b(schedule|cron|recurring)\b",
    r"\b(discord|slack|telegram)\b",
];

/// The default per-backend pattern groups.
pub const DEFAULT_PATTERN_SETS: &[PatternSet] = &[
    PatternSet {
        backend_id: "agent-cli",
        patterns: AGENT_CLI_PATTERNS,
    },
    PatternSet {
        backend_id: "reasoning-api",
        patterns: REASONING_PATTERNS,
    },
    PatternSet {
        backend_id: "fast-inference",
        patterns: FAST_INFERENCE_PATTERNS,
    },
];
