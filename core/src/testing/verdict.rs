use super::outcome::ExecutionOutcome;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter,
)]
pub enum Verdict {
    #[strum(serialize = "AC")]
    Accepted,
    #[strum(serialize = "WA")]
    WrongAnswer,
    #[strum(serialize = "RE")]
    RuntimeError,
    #[strum(serialize = "TLE")]
    TimedOut,
}

/// Non-fatal remark shown next to a verdict. Never changes the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// Accepted only after trimming: leading or trailing whitespace differs.
    SurroundingWhitespace,
}

impl Advisory {
    pub fn message(self) -> &'static str {
        match self {
            Advisory::SurroundingWhitespace => "Check leading and trailing blank spaces",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Judgement {
    pub verdict: Verdict,
    pub advisory: Option<Advisory>,
}

impl From<Verdict> for Judgement {
    fn from(verdict: Verdict) -> Self {
        Self {
            verdict,
            advisory: None,
        }
    }
}

/// Timeout first, then exit status, then whole-buffer trimmed comparison.
///
/// The trim is applied once to each entire buffer, not per line, so a blank line in the
/// middle of the output is still a wrong answer.
pub fn evaluate(outcome: &ExecutionOutcome, expected: &[u8]) -> Judgement {
    if outcome.timed_out {
        return Verdict::TimedOut.into();
    }
    if outcome.status != Some(0) {
        return Verdict::RuntimeError.into();
    }

    if !self::same_after_trim(&outcome.stdout, expected) {
        return Verdict::WrongAnswer.into();
    }

    Judgement {
        verdict: Verdict::Accepted,
        advisory: (outcome.stdout != expected).then_some(Advisory::SurroundingWhitespace),
    }
}

/// Falls back to an ASCII-whitespace trim of the raw bytes unless both sides are UTF-8.
fn same_after_trim(actual: &[u8], expected: &[u8]) -> bool {
    match (std::str::from_utf8(actual), std::str::from_utf8(expected)) {
        (Ok(a), Ok(e)) => a.trim() == e.trim(),
        _ => trim_ascii_bytes(actual) == trim_ascii_bytes(expected),
    }
}

fn trim_ascii_bytes(mut b: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = b {
        if !first.is_ascii_whitespace() {
            break;
        }
        b = rest;
    }
    while let [rest @ .., last] = b {
        if !last.is_ascii_whitespace() {
            break;
        }
        b = rest;
    }
    b
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;

    fn exited(status: i32, stdout: &str) -> ExecutionOutcome {
        ExecutionOutcome {
            status: Some(status),
            stdout: stdout.into(),
            stderr: Vec::new(),
            timed_out: false,
            execution_time: Duration::from_millis(10),
        }
    }

    fn judge(v: Verdict, advisory: Option<Advisory>) -> Judgement {
        Judgement { verdict: v, advisory }
    }

    #[test]
    fn should_be_ac() {
        assert_eq!(evaluate(&exited(0, "1 2\n3\n"), b"1 2\n3\n"), judge(Verdict::Accepted, None));
        assert_eq!(evaluate(&exited(0, ""), b""), judge(Verdict::Accepted, None));
    }

    #[test]
    fn should_be_ac_with_advisory_if_only_surrounding_whitespace_differs() {
        use Advisory::SurroundingWhitespace as W;
        assert_eq!(evaluate(&exited(0, "42\n"), b"42"), judge(Verdict::Accepted, Some(W)));
        assert_eq!(evaluate(&exited(0, "  42"), b"42\n\n"), judge(Verdict::Accepted, Some(W)));
        assert_eq!(evaluate(&exited(0, "\n\t"), b""), judge(Verdict::Accepted, Some(W)));
        assert_eq!(evaluate(&exited(0, "a\r\nb\r\n"), b"a\r\nb"), judge(Verdict::Accepted, Some(W)));
    }

    #[test]
    fn should_be_wa_if_inner_whitespace_differs() {
        assert_eq!(evaluate(&exited(0, "41\n"), b"42\n").verdict, Verdict::WrongAnswer);
        // whole-buffer trim: interior blank lines and per-line trailing spaces still count
        assert_eq!(evaluate(&exited(0, "1\n\n2\n"), b"1\n2\n").verdict, Verdict::WrongAnswer);
        assert_eq!(evaluate(&exited(0, "1 \n2\n"), b"1\n2\n").verdict, Verdict::WrongAnswer);
        assert_eq!(evaluate(&exited(0, ""), b"0\n").verdict, Verdict::WrongAnswer);
    }

    #[test]
    fn invalid_utf8_is_compared_byte_for_byte() {
        let mut o = exited(0, "");
        o.stdout = vec![0xFF];
        assert_eq!(evaluate(&o, &[0xFE]), judge(Verdict::WrongAnswer, None));
        assert_eq!(evaluate(&o, &[0xFF]), judge(Verdict::Accepted, None));

        o.stdout = vec![b' ', 0xFF, b'\n'];
        assert_eq!(
            evaluate(&o, &[0xFF]),
            judge(Verdict::Accepted, Some(Advisory::SurroundingWhitespace))
        );
        assert_eq!(evaluate(&o, &[0xFE, b'\n']).verdict, Verdict::WrongAnswer);
    }

    #[test]
    fn should_be_re_even_if_stdout_is_correct() {
        assert_eq!(evaluate(&exited(1, "42\n"), b"42\n"), judge(Verdict::RuntimeError, None));
        assert_eq!(evaluate(&exited(-1, ""), b""), judge(Verdict::RuntimeError, None));

        let mut signaled = exited(0, "42\n");
        signaled.status = None;
        assert_eq!(evaluate(&signaled, b"42\n").verdict, Verdict::RuntimeError);
    }

    #[test]
    fn tle_overrides_everything() {
        for status in [None, Some(0), Some(1)] {
            let mut o = exited(0, "42\n");
            o.status = status;
            o.timed_out = true;
            assert_eq!(evaluate(&o, b"42\n"), judge(Verdict::TimedOut, None));
        }
        let o = ExecutionOutcome::timed_out(Duration::from_millis(4000));
        assert_eq!(evaluate(&o, b"").verdict, Verdict::TimedOut);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let o = exited(0, "3\n1 2\n");
        let first = evaluate(&o, b"3\n1 2");
        for _ in 0..10 {
            assert_eq!(evaluate(&o, b"3\n1 2"), first);
        }
    }

    #[test]
    fn short_codes() {
        let codes: Vec<_> = <Verdict as strum::IntoEnumIterator>::iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(codes, ["AC", "WA", "RE", "TLE"]);
    }
}
