/// Hex MD5 digest of `password`, except that every byte whose hex pair starts with `0`
/// gets that `0` replaced by `c`. This is what the vendor server expects as `password`.
pub fn hash_password(password: &str) -> String {
    let digest = format!("{:x}", md5::compute(password.as_bytes()));

    digest
        .chars()
        .enumerate()
        .map(|(i, c)| if i % 2 == 0 && c == '0' { 'c' } else { c })
        .collect()
}
