use eyre::EyreHandler;
use itertools::Itertools;
use std::{error::Error, fmt};

/// Error report format for the `wave` binary: the error on one line, then each distinct cause
/// indented below it. With `WAVE_DEBUG` set the verbose `color-eyre` report is used instead.
pub struct Handler {
    verbose: Option<Box<dyn EyreHandler>>,
}

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Display;
        dedup_chain(error).into_iter().format("; ").fmt(f)
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(verbose) = &self.verbose {
            return verbose.debug(error, f);
        }
        if f.alternate() {
            return fmt::Debug::fmt(error, f);
        }

        let chain = dedup_chain(error);
        let mut chain = chain.iter();
        if let Some(error) = chain.next() {
            write!(f, "{error}")?;
        }
        for cause in chain {
            write!(f, "\n  caused by: {cause}")?;
        }
        Ok(())
    }

    fn track_caller(&mut self, location: &'static std::panic::Location<'static>) {
        if let Some(verbose) = &mut self.verbose {
            verbose.track_caller(location);
        }
    }
}

/// Messages of `error` and its sources, dropping a source whose message the previous one
/// already contains (`msg1: msg2; msg2` becomes `msg1: msg2`).
pub fn dedup_chain(error: &(dyn Error + 'static)) -> Vec<String> {
    let mut causes = Vec::new();
    let mut next = Some(error);
    while let Some(cause) = next {
        causes.push(cause.to_string().trim().to_string());
        next = cause.source();
    }
    causes.dedup_by(|b, a| a.contains(b.as_str()));
    causes
}

/// Installs the eyre and panic hooks. Panics always get the verbose report.
pub fn install() {
    let (panic_hook, debug_hook) = color_eyre::config::HookBuilder::default()
        .panic_section("This is a bug, please report it.")
        .into_hooks();
    panic_hook.install();
    let debug_hook = debug_hook.into_eyre_hook();
    let debug = std::env::var_os("WAVE_DEBUG").is_some();
    if let Err(e) = eyre::set_hook(Box::new(move |e| {
        Box::new(Handler { verbose: debug.then(|| debug_hook(e)) })
    })) {
        debug!("failed to install eyre error hook: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(thiserror::Error, Debug)]
    #[error("my error: {0}")]
    struct A(#[from] B);

    #[derive(thiserror::Error, Debug)]
    #[error("{0}")]
    struct B(String);

    #[test]
    fn dedups_contained() {
        let err = A(B("hello".into()));
        assert_eq!(dedup_chain(&err), ["my error: hello"]);
    }

    #[test]
    fn keeps_distinct_sources() {
        #[derive(thiserror::Error, Debug)]
        #[error("failed to submit wave")]
        struct C(#[source] B);

        let err = C(B("user rejected".into()));
        assert_eq!(dedup_chain(&err), ["failed to submit wave", "user rejected"]);
    }

    #[test]
    fn report_lists_causes() {
        struct Report<'a>(&'a (dyn Error + 'static));

        impl fmt::Debug for Report<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                Handler { verbose: None }.debug(self.0, f)
            }
        }

        #[derive(thiserror::Error, Debug)]
        #[error("failed to fetch waves")]
        struct C(#[source] A);

        let err = C(A(B("execution reverted".into())));
        assert_eq!(
            format!("{:?}", Report(&err)),
            "failed to fetch waves\n  caused by: my error: execution reverted"
        );
        assert_eq!(
            format!("{}", dedup_chain(&err).into_iter().format("; ")),
            "failed to fetch waves; my error: execution reverted"
        );
    }
}
