//! Exit code constants for the carousel CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, uninitialized session, invalid state)
//! - 2: Contract failure (empty prompt/input, parse or format violation, no images)
//! - 3: Service failure (image or text generation call failed)
//! - 4: Credential missing (no API key configured for this session)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, uninitialized session, or invalid state.
pub const USER_ERROR: i32 = 1;

/// Contract failure: empty prompt/input, AI reply parse or format violation,
/// or an export with no images present.
pub const CONTRACT_FAILURE: i32 = 2;

/// Service failure: an external generation call failed.
pub const SERVICE_FAILURE: i32 = 3;

/// Credential missing: no API key was present at process start.
pub const CREDENTIAL_MISSING: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            USER_ERROR,
            CONTRACT_FAILURE,
            SERVICE_FAILURE,
            CREDENTIAL_MISSING,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }
}
