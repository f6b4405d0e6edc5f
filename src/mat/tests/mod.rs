
/// 小端文件头
fn header_le() -> Vec<u8> {
    let mut header = b"MATLAB 5.0 MAT-file, hand made".to_vec();
    header.resize(116, b' ');
    header.extend_from_slice(&[0u8; 8]);
    header.extend_from_slice(&0x0100u16.to_le_bytes());
    header.extend_from_slice(b"IM");
    header
}

/// 小端数据元素（含填充）
fn element_le(data_type: u32, data: &[u8]) -> Vec<u8> {
    let mut out = data_type.to_le_bytes().to_vec();
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    while out.len() % 8 != 0 {
        out.push(0);
    }
    out
}

/// 手工拼装一个小端 miMATRIX 元素，变量名使用普通元素格式
fn matrix_le(name: &str, flag_word: u32, dims: &[i32], real_type: u32, real: &[u8]) -> Vec<u8> {
    let mut flags = flag_word.to_le_bytes().to_vec();
    flags.extend_from_slice(&0u32.to_le_bytes());
    let dims: Vec<u8> = dims.iter().flat_map(|d| d.to_le_bytes()).collect();

    let mut payload = element_le(6, &flags);
    payload.extend(element_le(5, &dims));
    payload.extend(element_le(1, name.as_bytes()));
    payload.extend(element_le(real_type, real));
    element_le(14, &payload)
}
