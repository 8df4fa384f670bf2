use rand::Rng;

/// 生成6位数字验证码，均匀分布于 [100000, 999999]
pub fn generate_verification_code() -> String {
    let mut rng = rand::thread_rng();
    format!("{:06}", rng.gen_range(100000..=999999))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_six_ascii_digits() {
        for _ in 0..200 {
            let code = generate_verification_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));

            let code_num: u32 = code.parse().unwrap();
            assert!((100000..=999999).contains(&code_num));
        }
    }
}
