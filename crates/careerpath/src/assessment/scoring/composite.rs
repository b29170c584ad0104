use super::DomainScore;

const CODE_LENGTH: usize = 3;

/// Concatenate the ids of the highest scoring domains, highest first. Equal scores keep their
/// definition order.
pub(crate) fn holland_code(domains: &[DomainScore]) -> (String, Vec<String>) {
    let mut ranked: Vec<&DomainScore> = domains.iter().collect();
    ranked.sort_by(|left, right| right.score.cmp(&left.score));

    let top_three: Vec<String> = ranked
        .into_iter()
        .take(CODE_LENGTH)
        .map(|domain| domain.id.clone())
        .collect();
    (top_three.concat(), top_three)
}
