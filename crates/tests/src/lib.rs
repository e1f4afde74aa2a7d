#[cfg(test)]
mod common;

#[cfg(test)]
mod guard_redirect_tests;

#[cfg(test)]
mod guard_claims_tests;

#[cfg(test)]
mod guard_agreement_tests;

#[cfg(test)]
mod health_tests;
