// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_kumihan_content(size: usize) -> String {
    let base = "# 見出し1 #章タイトル##\n\n本文に # 太字 #強調## と **markdown** を含む段落。\n続きの行。\n\n- 項目 # 下線 #一##\n- 項目二\n\n# 枠線 color=#336699\n枠の中の文章\n# 注意 #警告##\n##\n\n# コード\n# 太字 #raw##\n##\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_nested_blocks(sections: usize, depth: usize) -> String {
    let mut content = String::new();
    for section in 0..sections {
        content.push_str(&format!("# 見出し2 #節{section}##\n\n"));
        for _ in 0..depth {
            content.push_str("# 枠線\n");
        }
        content.push_str("深い本文 # 太字 #x##\n");
        for _ in 0..depth {
            content.push_str("##\n");
        }
        content.push('\n');
    }
    content
}
