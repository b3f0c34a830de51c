// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_tei_volume(pages: usize, lines_per_page: usize) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<TEI xmlns:cb=\"http://www.cbeta.org/ns/1.0\">\n\
         <teiHeader><fileDesc><titleStmt><title>長阿含經</title></titleStmt></fileDesc></teiHeader>\n\
         <text><body>\n<cb:juan n=\"001\" fun=\"open\"><cb:jhead>長阿含經卷第一</cb:jhead></cb:juan>\n",
    );

    for page in 0..pages {
        xml.push_str(&format!("<pb ed=\"T\" n=\"{page:04}a\"/>\n"));
        xml.push_str(&format!("<p xml:id=\"p{page:04}\">"));
        for line in 0..lines_per_page {
            xml.push_str(&format!("<lb ed=\"T\" n=\"{page:04}a{line:02}\"/>"));
            xml.push_str("如是我聞：一時，佛在舍衛國祇樹給孤獨園&amp;");
            if line % 5 == 0 {
                xml.push_str(&format!(
                    "<note n=\"{page:04}{line:03}\" resp=\"Taisho\" type=\"orig\">園＝薗【宋】</note>"
                ));
            }
            xml.push_str("與大比丘眾千二百五十人俱。\n");
        }
        xml.push_str("</p>\n");
    }

    xml.push_str("</body></text>\n</TEI>\n");
    xml
}
