//! Thread pages shared by tests.

/// One top-level comment row as served by the thread page.
pub const SAMPLE_ITEM: &str = r##"<tr class="athing comtr" id="41555035"><td><table border="0"><tr><td class="ind" indent="0"><img src="s.gif" height="1" width="0"></td>
<td class="votelinks" valign="top"><center><a id="up_41555035" href="vote?id=41555035&amp;how=up&amp;goto=item%3Fid%3D41425910"><div class="votearrow" title="upvote"></div></a></center></td><td class="default"><div style="margin-top:2px; margin-bottom:-10px;">
<span class="comhead"><a href="user?id=OnjaMadagascar" class="hnuser">OnjaMadagascar</a> <span class="age" title="2024-09-16T11:40:43"><a href="item?id=41555035">48 minutes ago</a></span> <span id="unv_41555035"></span><span class="navs"> | <a href="#41554922" class="clicky" aria-hidden="true">next</a> <a class="togg clicky" id="41555035" n="1" href="javascript:void(0)">[–]</a><span class="onstory"></span></span></span></div><br>
<div class="comment"><div class="commtext c00">Onja | Designer | Full-Time | Antananarivo</div><div class="reply"><p><font size="1"><u><a href="reply?id=41555035&amp;goto=item%3Fid%3D41425910%2341555035" rel="nofollow">reply</a></u></font></p></div></div></td></tr></table></td></tr>"##;

/// Wrap comment rows in the page chrome of a thread.
pub fn thread_with(rows: &str) -> String {
    format!(
        r##"<html lang="en" op="item"><head><title>Ask HN: Who is hiring? (September 2024)</title></head><body><center><table id="hnmain"><tr><td>
<table class="fatitem"><tr class="athing" id="41425910"><td class="title"><span class="titleline"><a href="item?id=41425910">Ask HN: Who is hiring? (September 2024)</a></span></td></tr></table>
<br><table class="comment-tree">{rows}</table>
</td></tr></table></center></body></html>"##
    )
}

/// A thread with three top-level postings and one reply.
pub const THREAD_PAGE: &str = concat!(
    r##"<html lang="en" op="item"><head><title>Ask HN: Who is hiring? (September 2024)</title></head><body><center><table id="hnmain"><tr><td>
<table class="fatitem"><tr class="athing" id="41425910"><td class="title"><span class="titleline"><a href="item?id=41425910">Ask HN: Who is hiring? (September 2024)</a></span></td></tr></table>
<br><table class="comment-tree">"##,
    r##"<tr class="athing comtr" id="41555035"><td><table border="0"><tr><td class="ind" indent="0"><img src="s.gif" height="1" width="0"></td>
<td class="default"><span class="comhead"><a href="user?id=OnjaMadagascar" class="hnuser">OnjaMadagascar</a> <span class="age"><a href="item?id=41555035">48 minutes ago</a></span></span>
<div class="comment"><div class="commtext c00">Onja | Designer | Full-Time | Antananarivo</div></div></td></tr></table></td></tr>"##,
    r##"<tr class="athing comtr" id="41555100"><td><table border="0"><tr><td class="ind" indent="0"><img src="s.gif" height="1" width="0"></td>
<td class="default"><span class="comhead"><a href="user?id=acme_hr" class="hnuser">acme_hr</a> <span class="age"><a href="item?id=41555100">30 minutes ago</a></span></span>
<div class="comment"><div class="commtext c00">Acme Corp | Senior Rust Engineer | Remote (EU)<p>Apply at <a href="https://acme.example/jobs" rel="nofollow">https://acme.example/jobs</a></p></div></div></td></tr></table></td></tr>"##,
    r##"<tr class="athing comtr" id="41555200"><td><table border="0"><tr><td class="ind" indent="1"><img src="s.gif" height="1" width="40"></td>
<td class="default"><span class="comhead"><a href="user?id=curious_dev" class="hnuser">curious_dev</a> <span class="age"><a href="item?id=41555200">10 minutes ago</a></span></span>
<div class="comment"><div class="commtext c00">Is this role open to contractors?</div></div></td></tr></table></td></tr>"##,
    r##"<tr class="athing comtr" id="41555300"><td><table border="0"><tr><td class="ind" indent="0"><img src="s.gif" height="1" width="0"></td>
<td class="default"><span class="comhead"><a href="user?id=acme_hr" class="hnuser">acme_hr</a> <span class="age"><a href="item?id=41555300">5 minutes ago</a></span></span>
<div class="comment"><div class="commtext c00">Acme Corp | Data Engineer | Remote</div></div></td></tr></table></td></tr>"##,
    r##"</table>
</td></tr></table></center></body></html>"##
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_item_keeps_navigation_links() {
        assert!(SAMPLE_ITEM.contains(r##"<a href="#41554922" class="clicky""##));
        assert!(SAMPLE_ITEM.ends_with("</tr>"));
        assert!(thread_with(SAMPLE_ITEM).contains("#41554922"));
    }
}
