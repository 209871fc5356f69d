//! 位取反编解码
//!
//! 部分设备以取反形式存储数据。取反是自逆的，所以同一个函数既用于
//! 从设备读取后的解码，也用于写回设备前的编码。
//! 镜像缓冲区中始终保存逻辑（未取反）内容。

use crate::consts::INVERT_MASK;
use alloc::vec::Vec;

/// 对每个字节按位取反，返回新缓冲区
pub fn invert(data: &[u8]) -> Vec<u8> {
    data.iter().map(|b| b ^ INVERT_MASK).collect()
}

/// 原地按位取反
pub fn invert_in_place(data: &mut [u8]) {
    for b in data.iter_mut() {
        *b ^= INVERT_MASK;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_invert_values() {
        assert_eq!(invert(&[0x00, 0xFF, 0x0F, 0xA5]), vec![0xFF, 0x00, 0xF0, 0x5A]);
    }

    #[test]
    fn test_invert_is_involution() {
        let inputs: [&[u8]; 4] = [&[], &[0x12], &[1, 2, 3], &[0xDE, 0xAD, 0xBE, 0xEF, 0x00]];
        for input in inputs {
            assert_eq!(invert(&invert(input)), input);
        }
    }

    #[test]
    fn test_invert_in_place_matches_invert() {
        let original = [0x01u8, 0x80, 0x7F];
        let mut buf = original;
        invert_in_place(&mut buf);
        assert_eq!(buf.as_slice(), invert(&original).as_slice());

        invert_in_place(&mut buf);
        assert_eq!(buf, original);
    }
}
