//! 转换器复合与修剪

use rustfst::algorithms::compose::compose;
use rustfst::prelude::{connect, tr_sort, CoreFst, ILabelCompare, OLabelCompare};

use crate::error::NormalizeResult;
use crate::wfst::fst::{Fst, StdFst};

impl Fst {
    /// 复合 `self ∘ other`：`self` 的输出作为 `other` 的输入
    ///
    /// 左侧按输出标签、右侧按输入标签排序后交给 `rustfst` 复合，结果再修剪。
    pub fn compose(&self, other: &Fst) -> NormalizeResult<Fst> {
        let mut left = self.inner.clone();
        tr_sort(&mut left, OLabelCompare {});
        let mut right = other.inner.clone();
        tr_sort(&mut right, ILabelCompare {});

        let product: StdFst = compose(left, right)?;
        Fst { inner: product }.connect()
    }

    /// 删除不可达或无法到达接受状态的状态
    ///
    /// 语言为空时返回只有起始状态的空转换器，后续并、串接仍可使用。
    pub fn connect(self) -> NormalizeResult<Fst> {
        let mut fst = self.inner;
        connect(&mut fst)?;
        if fst.start().is_none() {
            return Fst::empty();
        }
        Ok(Fst { inner: fst })
    }
}
