/// Cosine similarity of two equally sized vectors, accumulated in `f64`.
///
/// Returns `0.0` when either vector has zero magnitude or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
	if a.len() != b.len() || a.is_empty() {
		return 0.0;
	}

	let mut dot = 0.0_f64;
	let mut norm_a = 0.0_f64;
	let mut norm_b = 0.0_f64;

	for (x, y) in a.iter().zip(b) {
		let (x, y) = (f64::from(*x), f64::from(*y));

		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	if norm_a == 0.0 || norm_b == 0.0 {
		return 0.0;
	}

	dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Scales `vector` to unit length in place, the form a cosine index stores. Zero vectors are left
/// untouched.
pub fn normalize(vector: &mut [f32]) {
	let norm = vector.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt();

	if norm == 0.0 || !norm.is_finite() {
		return;
	}

	for x in vector.iter_mut() {
		*x = (f64::from(*x) / norm) as f32;
	}
}

/// Component-wise equality with an absolute per-component tolerance. A tolerance of zero demands
/// bit-for-bit equal values.
pub fn same_vector(a: &[f32], b: &[f32], tolerance: f32) -> bool {
	a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y || (x - y).abs() <= tolerance)
}
