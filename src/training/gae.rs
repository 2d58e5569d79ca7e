//! Generalized Advantage Estimation (GAE-λ).
//!
//! `A_t = Σ_l (γλ)^l δ_{t+l}` with `δ_t = r_t + γ V(s_{t+1}) - V(s_t)`.

/// Discounted cumulative sum: `out[t] = Σ_{k>=t} discount^(k-t) xs[k]`.
pub fn discount_cumsum(xs: &[f64], discount: f64) -> Vec<f64> {
    let mut out = vec![0.0; xs.len()];
    let mut running = 0.0;
    for t in (0..xs.len()).rev() {
        running = xs[t] + discount * running;
        out[t] = running;
    }
    out
}

/// Computes GAE-λ advantages and discounted returns.
///
/// # Arguments
///
/// * `rewards` - Per-step rewards
/// * `values` - Per-step value estimates from the critic
/// * `dones` - Per-step episode termination flags
/// * `last_value` - Value of the state after the final step, used to
///   bootstrap a path cut off before termination (ignored if the last step is done)
/// * `gamma` - Discount factor
/// * `gae_lambda` - GAE λ parameter (0 = TD(0), 1 = Monte Carlo)
///
/// # Returns
///
/// `(advantages, returns)` where `returns = advantages + values`.
pub fn compute_gae(
    rewards: &[f64],
    values: &[f64],
    dones: &[bool],
    last_value: f64,
    gamma: f64,
    gae_lambda: f64,
) -> (Vec<f64>, Vec<f64>) {
    let n = rewards.len();
    assert_eq!(values.len(), n);
    assert_eq!(dones.len(), n);

    let mut advantages = vec![0.0; n];
    let mut gae = 0.0;
    let mut next_value = last_value;

    for t in (0..n).rev() {
        let next_non_terminal = if dones[t] { 0.0 } else { 1.0 };

        let delta = rewards[t] + gamma * next_value * next_non_terminal - values[t];
        gae = delta + gamma * gae_lambda * next_non_terminal * gae;
        advantages[t] = gae;
        next_value = values[t];
    }

    let returns: Vec<f64> = advantages
        .iter()
        .zip(values.iter())
        .map(|(a, v)| a + v)
        .collect();

    (advantages, returns)
}
