//! Reed-Solomon error correction codewords over GF(256).
//!
//! The field uses the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1 (0x11D)
//! with generator element 0x02. Log and antilog tables are computed at
//! compile time and are read-only afterwards.

struct Tables {
    exp: [u8; 256],
    log: [u8; 256],
}

const fn build_tables() -> Tables {
    let mut exp = [0u8; 256];
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = x as u8;
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= 0x11D;
        }
        i += 1;
    }
    exp[255] = exp[0];
    Tables { exp, log }
}

static TABLES: Tables = build_tables();

/// GF(256) field operations using log/exp tables.
pub struct Gf256;

impl Gf256 {
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_a = TABLES.log[a as usize] as usize;
        let log_b = TABLES.log[b as usize] as usize;
        TABLES.exp[(log_a + log_b) % 255]
    }

    /// The generator element raised to `n`.
    #[cfg(test)]
    fn exp(n: usize) -> u8 {
        TABLES.exp[n % 255]
    }
}

/// Computes the error correction codewords of one block.
///
/// The divisor is the monic polynomial of degree `degree` whose roots are
/// α^0 .. α^(degree-1). Its leading term is implicit.
pub struct ReedSolomonGenerator {
    divisor: Vec<u8>,
}

impl ReedSolomonGenerator {
    /// # Panics
    ///
    /// Panics if `degree` is outside [1, 255].
    pub fn new(degree: usize) -> Self {
        assert!((1..=255).contains(&degree), "Degree out of range");
        // Coefficients from highest to lowest power, leading 1 dropped.
        let mut divisor = vec![0u8; degree];
        divisor[degree - 1] = 1;
        let mut root: u8 = 1;
        for _ in 0..degree {
            for j in 0..degree {
                divisor[j] = Gf256::mul(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = Gf256::mul(root, 0x02);
        }
        Self { divisor }
    }

    /// Returns the remainder of `data * x^degree` divided by the generator.
    pub fn compute_remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.divisor.len()];
        for b in data {
            let factor: u8 = b ^ result[0];
            result.rotate_left(1);
            if let Some(last) = result.last_mut() {
                *last = 0;
            }
            for (x, &y) in result.iter_mut().zip(self.divisor.iter()) {
                *x ^= Gf256::mul(y, factor);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gf_div(a: u8, b: u8) -> u8 {
        assert!(b != 0, "Division by zero");
        if a == 0 {
            return 0;
        }
        let log_a = TABLES.log[a as usize] as usize;
        let log_b = TABLES.log[b as usize] as usize;
        TABLES.exp[(log_a + 255 - log_b) % 255]
    }

    /// Evaluates a polynomial stored lowest power first.
    fn eval_ascending(poly: &[u8], x: u8) -> u8 {
        poly.iter().rev().fold(0, |acc, &c| Gf256::mul(acc, x) ^ c)
    }

    /// Corrects up to `num_ecc / 2` symbol errors in place. `received[0]` is
    /// the coefficient of the highest power.
    fn rs_decode(received: &mut [u8], num_ecc: usize) -> Result<(), &'static str> {
        let n = received.len();
        let syndromes: Vec<u8> = (0..num_ecc)
            .map(|i| {
                received
                    .iter()
                    .fold(0, |acc, &c| Gf256::mul(acc, Gf256::exp(i)) ^ c)
            })
            .collect();
        if syndromes.iter().all(|&s| s == 0) {
            return Ok(());
        }

        // Berlekamp-Massey, polynomials lowest power first.
        let mut sigma = vec![1u8];
        let mut prev = vec![1u8];
        let mut prev_delta: u8 = 1;
        let mut l = 0usize;
        let mut m = 1usize;
        for k in 0..num_ecc {
            let mut delta = syndromes[k];
            for i in 1..=l {
                if i < sigma.len() {
                    delta ^= Gf256::mul(sigma[i], syndromes[k - i]);
                }
            }
            if delta == 0 {
                m += 1;
                continue;
            }
            let coef = gf_div(delta, prev_delta);
            let saved = sigma.clone();
            if sigma.len() < prev.len() + m {
                sigma.resize(prev.len() + m, 0);
            }
            for (i, &b) in prev.iter().enumerate() {
                sigma[i + m] ^= Gf256::mul(coef, b);
            }
            if 2 * l <= k {
                l = k + 1 - l;
                prev = saved;
                prev_delta = delta;
                m = 1;
            } else {
                m += 1;
            }
        }
        sigma.truncate(l + 1);

        // Chien search
        let positions: Vec<usize> = (0..n)
            .filter(|&j| eval_ascending(&sigma, Gf256::exp(255 - (n - 1 - j) % 255)) == 0)
            .collect();
        if positions.len() != l {
            return Err("Wrong number of error positions found");
        }

        // Forney
        let mut omega = vec![0u8; num_ecc];
        for (i, o) in omega.iter_mut().enumerate() {
            for j in 0..=i.min(l) {
                *o ^= Gf256::mul(sigma[j], syndromes[i - j]);
            }
        }
        for &j in &positions {
            let power = (n - 1 - j) % 255;
            let x_inv = Gf256::exp(255 - power);
            let omega_val = eval_ascending(&omega, x_inv);
            let mut sigma_prime = 0u8;
            for i in (1..sigma.len()).step_by(2) {
                sigma_prime ^= Gf256::mul(sigma[i], Gf256::exp((255 - power) * (i - 1)));
            }
            if sigma_prime == 0 {
                return Err("Sigma derivative is zero");
            }
            received[j] ^= Gf256::mul(Gf256::exp(power), gf_div(omega_val, sigma_prime));
        }
        Ok(())
    }

    fn codeword(data: &[u8], num_ecc: usize) -> Vec<u8> {
        let mut cw = data.to_vec();
        cw.extend(ReedSolomonGenerator::new(num_ecc).compute_remainder(data));
        cw
    }

    #[test]
    fn test_tables() {
        assert_eq!(Gf256::exp(0), 1);
        assert_eq!(Gf256::exp(8), 0x1D);
        assert_eq!(Gf256::exp(255), 1);
        assert_eq!(Gf256::mul(0, 5), 0);
        assert_eq!(gf_div(7, 7), 1);
        for a in 1..=255u8 {
            assert_eq!(gf_div(Gf256::mul(a, 0x53), 0x53), a);
        }
    }

    #[test]
    fn test_generator_degree_7() {
        // g(x) = x^7 + α^87 x^6 + α^229 x^5 + α^146 x^4 + α^149 x^3
        //        + α^238 x^2 + α^102 x + α^21
        let rs = ReedSolomonGenerator::new(7);
        let expected: Vec<u8> = [87, 229, 146, 149, 238, 102, 21]
            .iter()
            .map(|&e| Gf256::exp(e))
            .collect();
        assert_eq!(rs.divisor, expected);
    }

    #[test]
    fn test_hello_world_1m_ecc() {
        let data = [32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236, 17, 236, 17];
        let ecc = ReedSolomonGenerator::new(10).compute_remainder(&data);
        assert_eq!(ecc, vec![196, 35, 39, 119, 235, 215, 231, 226, 93, 23]);
    }

    #[test]
    fn test_codeword_has_zero_syndromes() {
        let cw = codeword(b"syndrome check", 16);
        for i in 0..16 {
            let s = cw.iter().fold(0, |acc, &c| Gf256::mul(acc, Gf256::exp(i)) ^ c);
            assert_eq!(s, 0);
        }
    }

    #[test]
    fn test_recovers_up_to_half_ecc() {
        let data: Vec<u8> = (0u8..40).map(|i| i.wrapping_mul(37).wrapping_add(11)).collect();
        for num_ecc in [2usize, 7, 10, 18, 26, 30] {
            let original = codeword(&data, num_ecc);
            let mut corrupted = original.clone();
            let count = num_ecc / 2;
            for k in 0..count {
                let pos = (k * 13 + 5) % corrupted.len();
                corrupted[pos] ^= 0xA5 ^ (k as u8);
            }
            rs_decode(&mut corrupted, num_ecc).unwrap();
            assert_eq!(corrupted, original, "num_ecc = {}", num_ecc);
        }
    }

    #[test]
    fn test_recovers_errors_in_ecc_region() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let original = codeword(&data, 8);
        let mut corrupted = original.clone();
        let total = corrupted.len();
        corrupted[total - 1] ^= 0xFF;
        corrupted[total - 2] ^= 0x33;
        corrupted[0] ^= 0x80;
        rs_decode(&mut corrupted, 8).unwrap();
        assert_eq!(&corrupted[..data.len()], &data);
    }

    #[test]
    #[should_panic(expected = "Degree out of range")]
    fn test_zero_degree_panics() {
        ReedSolomonGenerator::new(0);
    }
}
