//! SCORM data-model element names

/// Learner name, read once at initialization
pub const STUDENT_NAME: &str = "cmi.core.student_name";

/// `"incomplete"` | `"passed"` | `"failed"`
pub const LESSON_STATUS: &str = "cmi.core.lesson_status";

/// Integer score 0-100
pub const SCORE_RAW: &str = "cmi.core.score.raw";

/// Constant `"0"`, written at initialization
pub const SCORE_MIN: &str = "cmi.core.score.min";

/// Constant `"100"`, written at initialization
pub const SCORE_MAX: &str = "cmi.core.score.max";

/// `progress_<percent>` bookmark string
pub const LESSON_LOCATION: &str = "cmi.core.lesson_location";

/// Free-form session blob, `key=value` pairs joined with `|`
pub const SUSPEND_DATA: &str = "cmi.suspend_data";

/// Cleared (`""`) on completion
pub const EXIT: &str = "cmi.core.exit";
