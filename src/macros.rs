//! Macros for ergonomic machine wiring.

/// Register several transitions on a machine, stopping at the first error.
///
/// Each entry is `(from, input) => to`, or `(from, input, output) => to` for
/// a Mealy-style output. Evaluates to `Result<(), FsmError>`.
///
/// # Example
///
/// ```
/// use automata::core::State;
/// use automata::machine::Acceptor;
/// use automata::transitions;
///
/// let mut machine = Acceptor::new("contains_b");
/// let s0 = machine.add_state(State::new("S0").initial()).unwrap();
/// let s1 = machine.add_state(State::new("S1").accepting()).unwrap();
///
/// transitions!(machine;
///     (s0, 'a') => s0,
///     (s0, 'b') => s1,
///     (s1, 'a') => s1,
///     (s1, 'b') => s1,
/// )
/// .unwrap();
///
/// assert!(machine.process("ab".chars()).unwrap());
/// ```
#[macro_export]
macro_rules! transitions {
    (@one $machine:expr, $from:expr, $input:expr, $to:expr) => {
        $machine.set_transition($from, $input, $to)
    };

    (@one $machine:expr, $from:expr, $input:expr, $to:expr, $output:expr) => {
        $machine.set_transition_with_output($from, $input, $output, $to)
    };

    (
        $machine:expr;
        $(
            ($from:expr, $input:expr $(, $output:expr)?) => $to:expr
        ),* $(,)?
    ) => {
        (|| -> ::core::result::Result<(), $crate::core::FsmError> {
            $(
                $crate::transitions!(@one $machine, $from, $input, $to $(, $output)?)?;
            )*
            Ok(())
        })()
    };
}
