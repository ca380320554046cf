//! Adaptive acceptance threshold.
//!
//! A candidate is a duplicate of its nearest stored neighbor when their cosine similarity exceeds
//! the threshold. Each auxiliary field that corroborates the match lowers the threshold by that
//! field's weight. Weights are summed in a fixed field order before subtraction, so the result
//! does not depend on which fields are present or in what order they were supplied.

use crate::corroboration::{self, AuxiliaryMetadata, CorroborationField, Corroborators};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdPolicy {
	base: f64,
	company_weight: f64,
	title_weight: f64,
	url_weight: f64,
}
impl ThresholdPolicy {
	pub const fn new(base: f64, company_weight: f64, title_weight: f64, url_weight: f64) -> Self {
		Self { base, company_weight, title_weight, url_weight }
	}

	pub fn from_config(cfg: &nodup_config::Dedup) -> Self {
		Self::new(cfg.base_threshold, cfg.weights.company, cfg.weights.title, cfg.weights.url)
	}

	pub fn base(&self) -> f64 {
		self.base
	}

	pub fn weight(&self, field: CorroborationField) -> f64 {
		match field {
			CorroborationField::Company => self.company_weight,
			CorroborationField::Title => self.title_weight,
			CorroborationField::Url => self.url_weight,
		}
	}

	/// The lowest threshold reachable, with every field corroborated.
	pub fn floor(&self) -> f64 {
		self.base - CorroborationField::ALL.iter().map(|field| self.weight(*field)).sum::<f64>()
	}

	pub fn compute(&self, candidate: &Corroborators, aux: &AuxiliaryMetadata) -> Threshold {
		let corroborated = CorroborationField::ALL
			.into_iter()
			.filter(|field| {
				candidate
					.get(*field)
					.is_some_and(|value| corroboration::corroborates(value, aux.values(*field)))
			})
			.collect::<Vec<_>>();
		let discount = corroborated.iter().map(|field| self.weight(*field)).sum::<f64>();

		Threshold { value: self.base - discount, corroborated }
	}
}
impl Default for ThresholdPolicy {
	fn default() -> Self {
		Self::from_config(&nodup_config::Dedup::default())
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Threshold {
	pub value: f64,
	/// Fields that lowered the threshold, in [`CorroborationField::ALL`] order.
	pub corroborated: Vec<CorroborationField>,
}
impl Threshold {
	pub fn accepts(&self, similarity: f64) -> bool {
		similarity > self.value
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn aux() -> AuxiliaryMetadata {
		let mut aux = AuxiliaryMetadata::default();

		aux.push_row(
			Some("Acme Corporation".to_string()),
			Some("Senior Backend Engineer".to_string()),
			Some("https://jobs.acme.test/backend".to_string()),
		);

		aux
	}

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-6
	}

	#[test]
	fn no_corroboration_keeps_base() {
		let threshold = ThresholdPolicy::default().compute(&Corroborators::default(), &aux());

		assert_eq!(threshold.value, nodup_config::DEFAULT_BASE_THRESHOLD);
		assert!(threshold.corroborated.is_empty());
	}

	#[test]
	fn company_match_lowers_by_company_weight() {
		let candidate: Corroborators = [(CorroborationField::Company, "Acme")].into_iter().collect();
		let threshold = ThresholdPolicy::default().compute(&candidate, &aux());

		assert!(close(threshold.value, 0.945));
		assert_eq!(threshold.corroborated, vec![CorroborationField::Company]);
	}

	#[test]
	fn all_fields_reach_floor() {
		let candidate: Corroborators = [
			(CorroborationField::Url, "https://jobs.acme.test/backend"),
			(CorroborationField::Title, "Backend Engineer"),
			(CorroborationField::Company, "Acme"),
		]
		.into_iter()
		.collect();
		let policy = ThresholdPolicy::default();
		let threshold = policy.compute(&candidate, &aux());

		assert!(close(threshold.value, 0.77));
		assert_eq!(threshold.value, policy.floor());
		assert_eq!(threshold.corroborated, CorroborationField::ALL.to_vec());
	}

	#[test]
	fn non_matching_values_do_not_lower() {
		let candidate: Corroborators = [
			(CorroborationField::Company, "Globex"),
			(CorroborationField::Url, "https://globex.test"),
		]
		.into_iter()
		.collect();
		let threshold = ThresholdPolicy::default().compute(&candidate, &aux());

		assert_eq!(threshold.value, nodup_config::DEFAULT_BASE_THRESHOLD);
	}

	#[test]
	fn supply_order_does_not_change_result() {
		let policy = ThresholdPolicy::default();
		let company_then_url: Corroborators = [
			(CorroborationField::Company, "Acme"),
			(CorroborationField::Url, "jobs.acme.test"),
		]
		.into_iter()
		.collect();
		let url_then_company: Corroborators = [
			(CorroborationField::Url, "jobs.acme.test"),
			(CorroborationField::Company, "Acme"),
		]
		.into_iter()
		.collect();

		assert_eq!(policy.compute(&company_then_url, &aux()), policy.compute(&url_then_company, &aux()));
	}

	#[test]
	fn adding_matches_never_raises_threshold() {
		let policy = ThresholdPolicy::default();
		let matching = |field: CorroborationField| match field {
			CorroborationField::Company => "Acme",
			CorroborationField::Title => "Backend Engineer",
			CorroborationField::Url => "jobs.acme.test",
		};
		let subset = |mask: u8| -> Corroborators {
			CorroborationField::ALL
				.into_iter()
				.enumerate()
				.filter(|(idx, _)| mask & (1 << idx) != 0)
				.map(|(_, field)| (field, matching(field)))
				.collect()
		};

		for smaller in 0_u8..8 {
			let lower = policy.compute(&subset(smaller), &aux()).value;

			assert!(lower <= policy.base());
			assert!(lower >= policy.floor());

			for larger in (0_u8..8).filter(|larger| larger & smaller == smaller) {
				let upper = policy.compute(&subset(larger), &aux()).value;

				assert!(upper <= lower, "Mask {larger:03b} raised threshold over {smaller:03b}.");
			}
		}
	}

	#[test]
	fn acceptance_is_strictly_greater() {
		let threshold = Threshold { value: 0.945, corroborated: vec![CorroborationField::Company] };

		assert!(threshold.accepts(0.96));
		assert!(!threshold.accepts(0.945));
		assert!(!threshold.accepts(0.9));
	}

	#[test]
	fn acceptance_keeps_double_precision_near_the_boundary() {
		let threshold = Threshold { value: 0.945, corroborated: vec![CorroborationField::Company] };

		assert!(threshold.accepts(0.945 + 1e-12));
		assert!(!threshold.accepts(0.945 - 1e-12));
	}

	#[test]
	fn default_policy_matches_default_config() {
		assert_eq!(
			ThresholdPolicy::default(),
			ThresholdPolicy::from_config(&nodup_config::Dedup::default())
		);
		assert_eq!(ThresholdPolicy::default().base(), nodup_config::DEFAULT_BASE_THRESHOLD);
		assert_eq!(
			ThresholdPolicy::default().weight(CorroborationField::Url),
			nodup_config::DEFAULT_URL_WEIGHT
		);
	}

	#[test]
	fn policy_reads_config_weights() {
		let cfg = nodup_config::Dedup {
			base_threshold: 0.9,
			exact_match_tolerance: 0.0,
			weights: nodup_config::DedupWeights { company: 0.1, title: 0.2, url: 0.3 },
		};
		let policy = ThresholdPolicy::from_config(&cfg);

		assert_eq!(policy.base(), 0.9);
		assert_eq!(policy.weight(CorroborationField::Title), 0.2);
		assert!(close(policy.floor(), 0.3));
	}
}
