#[macro_export]
macro_rules! re {
    ($pat:expr) => {
        $crate::RulePattern::Regex(($pat).into())
    };
}

#[macro_export]
macro_rules! dim {
    ($d:ident) => {
        $crate::RulePattern::Dimension($crate::Dim::$d)
    };
}

#[macro_export]
macro_rules! pred {
    ($p:path) => {
        $crate::RulePattern::Predicate(stringify!($p), $p)
    };
}

#[macro_export]
macro_rules! rule {
    (
        name: $name:expr,
        pattern: [ $($pat:expr),* $(,)? ],
        prod: |$ts:ident, $args:ident| -> Option<$ret:ty> $body:block
        $(,)?
    ) => {{
        $crate::RuleDef {
            name: $name,
            pattern: vec![ $($pat),* ],
            production: Box::new(
                move |$ts: &chrono::NaiveDateTime, $args: &[$crate::Artifact]| {
                    let produced: Option<$ret> = $body;
                    produced.map($crate::Artifact::from)
                },
            ),
        }
    }};
}
