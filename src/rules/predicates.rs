//! Artifact predicates used as pattern atoms via `pred!`.

use crate::artifact::Artifact;

pub(crate) fn is_dom(artifact: &Artifact) -> bool {
    artifact.as_time().is_some_and(|t| t.is_dom())
}

pub(crate) fn is_doy(artifact: &Artifact) -> bool {
    artifact.as_time().is_some_and(|t| t.is_doy())
}

pub(crate) fn is_month(artifact: &Artifact) -> bool {
    artifact.as_time().is_some_and(|t| t.is_month())
}

pub(crate) fn is_year(artifact: &Artifact) -> bool {
    artifact.as_time().is_some_and(|t| t.is_year())
}

pub(crate) fn is_pod(artifact: &Artifact) -> bool {
    artifact.as_time().is_some_and(|t| t.is_pod())
}

pub(crate) fn is_tod(artifact: &Artifact) -> bool {
    artifact.as_time().is_some_and(|t| t.is_tod())
}

pub(crate) fn is_date(artifact: &Artifact) -> bool {
    artifact.as_time().is_some_and(|t| t.is_date())
}

pub(crate) fn is_date_time(artifact: &Artifact) -> bool {
    artifact.as_time().is_some_and(|t| t.is_date_time())
}

pub(crate) fn has_date(artifact: &Artifact) -> bool {
    artifact.as_time().is_some_and(|t| t.has_date())
}

pub(crate) fn has_dow(artifact: &Artifact) -> bool {
    artifact.as_time().is_some_and(|t| t.has_dow())
}
