//! Exit codes of the `stadtland` binary. Part of the public contract.

use stadtland_core::RoundError;

pub const SUCCESS: i32 = 0;
pub const INVALID_ROUND: i32 = 1; // Round JSON missing fields or malformed
pub const CONFIG_ERROR: i32 = 2; // Judge provider/key/config file problem
pub const JUDGE_UNAVAILABLE: i32 = 3; // Judge failed twice (network, timeout, non-2xx)
pub const JUDGE_REPLY_INVALID: i32 = 4; // Judge answered with something other than a verdict grid
pub const IO_ERROR: i32 = 5; // Round file or stdin unreadable, bind failed, server I/O
pub const INTERNAL_ERROR: i32 = 6; // Anything else

pub fn for_round_error(err: &RoundError) -> i32 {
    match err {
        RoundError::Validation { .. } => INVALID_ROUND,
        RoundError::Config { .. } => CONFIG_ERROR,
        RoundError::ExternalService { .. } => JUDGE_UNAVAILABLE,
        RoundError::ResponseFormat { .. } => JUDGE_REPLY_INVALID,
    }
}

/// Exit code for a top-level failure; looks through `anyhow` context.
pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(round) = err.chain().find_map(|e| e.downcast_ref::<RoundError>()) {
        return for_round_error(round);
    }
    if err.chain().any(|e| e.is::<std::io::Error>()) {
        return IO_ERROR;
    }
    INTERNAL_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_library_exit_codes() {
        let errors = [
            RoundError::validation("x"),
            RoundError::config("x"),
            RoundError::ExternalService {
                attempts: 2,
                message: "x".into(),
            },
            RoundError::response_format("x"),
        ];
        for err in &errors {
            assert_eq!(for_round_error(err), err.exit_code());
        }
    }

    #[test]
    fn io_and_wrapped_errors() {
        use anyhow::Context;

        let io: anyhow::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "round.json",
        ))
        .context("failed to read round file round.json");
        assert_eq!(for_error(&io.unwrap_err()), IO_ERROR);

        let round: anyhow::Result<()> =
            Err(RoundError::validation("letter is missing")).context("evaluate");
        assert_eq!(for_error(&round.unwrap_err()), INVALID_ROUND);

        assert_eq!(for_error(&anyhow::anyhow!("boom")), INTERNAL_ERROR);
    }
}
